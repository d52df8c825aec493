// Property-based tests for lowering and emission.
//
// Trees are generated from arithmetic expressions over a handful of variable
// names, wrapped in declarations, assignments, `if` and `while`.

use mips_compiler::ir::ast::{Node, Operator, TypeCode};
use mips_compiler::ir::{listing, Opcode, Operand, ProgramIR};
use mips_compiler::{compile_to_ir_with_options, compile_to_mips_with_options, CompileOptions, RegisterPolicy};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")].prop_map(String::from)
}

fn expr() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        (-1000i64..1000).prop_map(Node::int),
        name().prop_map(Node::variable),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (
                prop_oneof![
                    Just(Operator::Plus),
                    Just(Operator::Minus),
                    Just(Operator::Multiply),
                    Just(Operator::Divide),
                ],
                inner.clone(),
                inner.clone(),
            )
                .prop_map(|(op, l, r)| Node::binary(op, l, r)),
            inner.clone().prop_map(|e| Node::unary(Operator::Negate, e)),
            inner.prop_map(|e| Node::unary(Operator::Not, e)),
        ]
    })
}

fn simple_stmt() -> impl Strategy<Value = Node> {
    prop_oneof![
        (name(), expr()).prop_map(|(n, e)| Node::declaration(TypeCode::Int, &n, Some(e))),
        name().prop_map(|n| Node::declaration(TypeCode::Int, &n, None)),
        (name(), expr()).prop_map(|(n, e)| Node::assignment(&n, e)),
    ]
}

fn stmt() -> impl Strategy<Value = Node> {
    prop_oneof![
        3 => simple_stmt(),
        1 => (expr(), prop::collection::vec(simple_stmt(), 0..4), prop::option::of(simple_stmt()))
            .prop_map(|(c, then, els)| Node::if_stmt(c, Node::block(then), els)),
        1 => (expr(), prop::collection::vec(simple_stmt(), 0..4))
            .prop_map(|(c, body)| Node::while_loop(c, Node::block(body))),
    ]
}

fn program() -> impl Strategy<Value = Node> {
    prop::collection::vec(stmt(), 0..8).prop_map(Node::program)
}

fn options(closed: bool) -> CompileOptions {
    CompileOptions { close_control_flow: closed, ..Default::default() }
}

/// Temporaries in the order their defining instructions appear.
fn defined_temps(ir: &ProgramIR) -> Vec<u32> {
    ir.iter()
        .filter_map(|i| match i.result {
            Some(Operand::Temp(n)) => Some(n),
            _ => None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lowering_is_deterministic_across_sessions(tree in program(), closed in any::<bool>()) {
        let first = compile_to_ir_with_options(&tree, &options(closed)).unwrap();
        let second = compile_to_ir_with_options(&tree, &options(closed)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn temporaries_are_fresh_and_gapless(tree in program(), closed in any::<bool>()) {
        let ir = compile_to_ir_with_options(&tree, &options(closed)).unwrap();
        let temps = defined_temps(&ir);
        let expected: Vec<u32> = (0..temps.len() as u32).collect();
        prop_assert_eq!(temps, expected);
    }

    #[test]
    fn producers_precede_consumers(tree in program()) {
        // Closed loops put the condition ahead of its test; only the baseline
        // WHILE marker names a temporary before it exists.
        let ir = compile_to_ir_with_options(&tree, &options(true)).unwrap();
        let mut defined = std::collections::HashSet::new();
        for instr in &ir {
            for src in [&instr.arg1, &instr.arg2].into_iter().flatten() {
                if let Operand::Temp(n) = src {
                    prop_assert!(defined.contains(n), "%t{} used before definition in '{}'", n, instr);
                }
            }
            if let Some(Operand::Temp(n)) = instr.result {
                defined.insert(n);
            }
        }
    }

    #[test]
    fn listing_round_trips(tree in program(), closed in any::<bool>()) {
        let ir = compile_to_ir_with_options(&tree, &options(closed)).unwrap();
        let text = ir.to_lines().join("\n");
        prop_assert_eq!(listing::parse(&text).unwrap(), ir);
    }

    #[test]
    fn release_policy_maps_every_body_line(tree in program()) {
        let opts = CompileOptions {
            register_count: 18,
            register_policy: RegisterPolicy::ReleaseDeadTemps,
            close_control_flow: true,
        };
        let ir = compile_to_ir_with_options(&tree, &opts).unwrap();
        let asm = mips_compiler::backend::compile_ir_to_mips(&ir, &opts).unwrap();
        prop_assert_eq!(asm.lines.len(), asm.asm_ir_mapping.len());
        let body = &asm.asm_ir_mapping[4..asm.asm_ir_mapping.len() - 1];
        prop_assert!(body.iter().all(|m| matches!(m, Some(i) if *i < ir.len())));
        prop_assert!(!ir.iter().any(|i| i.op == Opcode::While), "closed loops never emit WHILE");
    }

    #[test]
    fn same_tree_same_assembly(tree in program()) {
        let opts = CompileOptions { register_count: 18, register_policy: RegisterPolicy::ReleaseDeadTemps, ..Default::default() };
        let a = compile_to_mips_with_options(&tree, &opts).unwrap();
        let b = compile_to_mips_with_options(&tree, &opts).unwrap();
        prop_assert_eq!(a, b);
    }
}
