//! Reader for the textual IR listing produced by [`ProgramIR::to_lines`].
//!
//! One instruction per line: `OPCODE [arg1[, arg2]] [-> result]`. Operands use
//! sigils: `%t<n>` temporaries, `@name` labels, `#text` immediates, bare
//! identifiers for variables. Blank lines and `;` comments are skipped.

use super::ir::{Instr, Opcode, Operand, ProgramIR};
use crate::CompileError;

pub fn parse(text: &str) -> Result<ProgramIR, CompileError> {
    let mut out = ProgramIR::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = match raw.find(';') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }
        out.instrs.push(parse_line(line, idx + 1)?);
    }
    Ok(out)
}

fn parse_line(line: &str, line_no: usize) -> Result<Instr, CompileError> {
    let (body, result) = match line.rsplit_once("->") {
        Some((lhs, rhs)) => (lhs.trim(), Some(parse_operand(rhs.trim(), line_no)?)),
        None => (line, None),
    };

    let (mnemonic, args) = match body.split_once(char::is_whitespace) {
        Some((m, rest)) => (m, rest.trim()),
        None => (body, ""),
    };
    let op: Opcode = mnemonic.parse()?;

    let mut instr = Instr::new(op);
    instr.result = result;
    if !args.is_empty() {
        let mut parts = args.split(',').map(str::trim);
        if let Some(a) = parts.next() {
            instr.arg1 = Some(parse_operand(a, line_no)?);
        }
        if let Some(b) = parts.next() {
            instr.arg2 = Some(parse_operand(b, line_no)?);
        }
        if parts.next().is_some() {
            return Err(listing_error(line_no, "more than two source operands"));
        }
    }
    Ok(instr)
}

fn parse_operand(text: &str, line_no: usize) -> Result<Operand, CompileError> {
    if let Some(n) = text.strip_prefix("%t") {
        return n
            .parse::<u32>()
            .map(Operand::Temp)
            .map_err(|_| listing_error(line_no, &format!("bad temporary '{text}'")));
    }
    if let Some(label) = text.strip_prefix('@') {
        if !is_identifier(label) {
            return Err(listing_error(line_no, &format!("bad label '{text}'")));
        }
        return Ok(Operand::label(label));
    }
    if let Some(imm) = text.strip_prefix('#') {
        if imm.is_empty() || imm.contains(char::is_whitespace) {
            return Err(listing_error(line_no, &format!("bad immediate '{text}'")));
        }
        return Ok(Operand::Imm(imm.to_string()));
    }
    if is_identifier(text) {
        return Ok(Operand::var(text));
    }
    Err(listing_error(line_no, &format!("bad operand '{text}'")))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn listing_error(line: usize, message: &str) -> CompileError {
    CompileError::Listing { line, message: message.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operand_sigils() {
        let ir = parse("+ %t0, y -> %t1\nIFGOTO %t1 -> @L3\nMOV #2.5 -> %t2").unwrap();
        assert_eq!(ir.instrs[0].arg1, Some(Operand::Temp(0)));
        assert_eq!(ir.instrs[0].arg2, Some(Operand::var("y")));
        assert_eq!(ir.instrs[1].result, Some(Operand::label("L3")));
        assert_eq!(ir.instrs[2].arg1, Some(Operand::Imm("2.5".into())));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let ir = parse("; header\n\nENTER_SCOPE ; open\nEXIT_SCOPE\n").unwrap();
        assert_eq!(ir.len(), 2);
        assert_eq!(ir.instrs[0].op, Opcode::EnterScope);
    }

    #[test]
    fn reports_line_of_bad_operand() {
        let err = parse("NOP -> x\nLOAD 9bad -> %t0").unwrap_err();
        assert!(matches!(err, CompileError::Listing { line: 2, .. }), "got {err:?}");
    }
}
