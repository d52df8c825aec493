use mips_compiler::ir::ast::{Node, NodeKind, Operator, TypeCode};
use mips_compiler::ir::ir_generator::{lower, Gen};
use mips_compiler::ir::{Opcode, Operand, ProgramIR};
use mips_compiler::{compile_to_ir, compile_to_ir_with_options, CompileError, CompileOptions};

fn closed() -> CompileOptions {
    CompileOptions { close_control_flow: true, ..Default::default() }
}

fn ops(ir: &ProgramIR) -> Vec<Opcode> {
    ir.iter().map(|i| i.op).collect()
}

// ── Expressions ──────────────────────────────────────────────────────────

#[test]
fn literal_becomes_single_mov() {
    let ir = compile_to_ir(&Node::program([Node::int(5)])).unwrap();
    assert_eq!(ir.to_lines(), vec!["MOV #5 -> %t0"]);
}

#[test]
fn addition_of_two_literals() {
    let tree = Node::program([Node::binary(Operator::Plus, Node::int(3), Node::int(4))]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(
        ir.to_lines(),
        vec!["MOV #3 -> %t0", "MOV #4 -> %t1", "+ %t0, %t1 -> %t2"],
        "operands are computed left to right before the operator"
    );
}

#[test]
fn float_literal_keeps_fraction() {
    let ir = compile_to_ir(&Node::program([Node::float(3.0)])).unwrap();
    assert_eq!(ir.instrs[0].arg1, Some(Operand::Imm("3.0".into())));
}

#[test]
fn variable_reference_loads_into_temp() {
    let ir = compile_to_ir(&Node::program([Node::variable("x")])).unwrap();
    assert_eq!(ir.to_lines(), vec!["LOAD x -> %t0"]);
}

#[test]
fn unary_operators() {
    let tree = Node::program([
        Node::unary(Operator::Negate, Node::int(1)),
        Node::unary(Operator::Not, Node::int(0)),
    ]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(ops(&ir), vec![Opcode::Mov, Opcode::Neg, Opcode::Mov, Opcode::Not]);
    assert_eq!(ir.instrs[1].result, Some(Operand::Temp(1)));
}

#[test]
fn call_lowers_arguments_before_call() {
    let tree = Node::program([Node::call("f", [Node::int(1), Node::variable("y")])]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(ir.to_lines(), vec!["MOV #1 -> %t0", "LOAD y -> %t1", "CALL @f -> %t2"]);
}

#[test]
fn array_declaration_and_access() {
    let tree = Node::program([
        Node::array_declaration(TypeCode::Int, "a", Node::int(4)),
        Node::array_access("a", Node::int(2)),
    ]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(
        ir.to_lines(),
        vec!["MOV #4 -> %t0", "ALLOC_ARRAY a, %t0", "MOV #2 -> %t1", "ARRAY_ACCESS a, %t1 -> %t2"]
    );
}

// ── Statements ───────────────────────────────────────────────────────────

#[test]
fn declaration_initializer_precedes_store() {
    let tree = Node::program([Node::declaration(TypeCode::Int, "x", Some(Node::int(7)))]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(ir.to_lines(), vec!["MOV #7 -> %t0", "= %t0 -> x"]);
}

#[test]
fn declaration_without_initializer_is_nop() {
    let tree = Node::program([Node::declaration(TypeCode::Float, "z", None)]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(ir.to_lines(), vec!["NOP -> z"]);
}

#[test]
fn assignment_stores_last_child() {
    let tree = Node::program([Node::assignment("x", Node::int(2))]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(ir.to_lines(), vec!["MOV #2 -> %t0", "= %t0 -> x"]);
}

#[test]
fn return_with_and_without_value() {
    let tree = Node::program([Node::return_stmt(Some(Node::int(0))), Node::return_stmt(None)]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(ir.to_lines(), vec!["MOV #0 -> %t0", "RETURN %t0", "RETURN"]);
}

#[test]
fn if_without_else_has_no_merge_label() {
    let tree = Node::program([Node::if_stmt(
        Node::variable("c"),
        Node::block([Node::assignment("y", Node::int(1))]),
        None,
    )]);
    let ir = lower(&tree).unwrap();
    assert_eq!(
        ir.to_lines(),
        vec![
            "LOAD c -> %t0",
            "IFGOTO %t0 -> @L0",
            "ENTER_SCOPE",
            "MOV #1 -> %t1",
            "= %t1 -> y",
            "EXIT_SCOPE",
        ]
    );
    assert!(!ops(&ir).contains(&Opcode::Label), "baseline if emits no LABEL");
}

#[test]
fn while_marker_precedes_its_condition() {
    let tree = Node::program([Node::while_loop(
        Node::variable("n"),
        Node::block([Node::assignment("n", Node::int(0))]),
    )]);
    let ir = lower(&tree).unwrap();
    assert_eq!(ir.instrs[0].op, Opcode::While);
    assert_eq!(ir.instrs[0].arg1, Some(Operand::Temp(0)));
    assert_eq!(ir.instrs[0].result, Some(Operand::label("L0")));
    assert_eq!(ir.instrs[1].op, Opcode::Load);
    assert_eq!(
        ir.instrs[1].result,
        Some(Operand::Temp(0)),
        "the condition's temporary is produced after the WHILE marker"
    );
}

#[test]
fn function_declaration_wraps_body_with_label_and_return() {
    let tree = Node::program([Node::function(
        TypeCode::Int,
        "one",
        &[(TypeCode::Int, "p")],
        Node::block([Node::return_stmt(Some(Node::int(1)))]),
    )]);
    let ir = compile_to_ir(&tree).unwrap();
    assert_eq!(
        ir.to_lines(),
        vec!["LABEL -> @one", "ENTER_SCOPE", "MOV #1 -> %t0", "RETURN %t0", "EXIT_SCOPE", "RETURN"]
    );
}

// ── Closed control flow ──────────────────────────────────────────────────

#[test]
fn closed_if_else_jumps_over_else_branch() {
    let tree = Node::program([Node::if_stmt(
        Node::variable("c"),
        Node::assignment("y", Node::int(1)),
        Some(Node::assignment("y", Node::int(2))),
    )]);
    let ir = compile_to_ir_with_options(&tree, &closed()).unwrap();
    assert_eq!(
        ir.to_lines(),
        vec![
            "LOAD c -> %t0",
            "IFGOTO %t0 -> @L0",
            "MOV #1 -> %t1",
            "= %t1 -> y",
            "GOTO -> @L1",
            "LABEL -> @L0",
            "MOV #2 -> %t2",
            "= %t2 -> y",
            "LABEL -> @L1",
        ]
    );
}

#[test]
fn closed_if_without_else_places_skip_label() {
    let tree = Node::program([Node::if_stmt(Node::variable("c"), Node::new(NodeKind::Block), None)]);
    let ir = compile_to_ir_with_options(&tree, &closed()).unwrap();
    assert_eq!(ir.instrs.last().map(|i| i.op), Some(Opcode::Label));
}

#[test]
fn closed_while_has_head_and_back_edge() {
    let tree = Node::program([Node::while_loop(
        Node::variable("n"),
        Node::block([Node::assignment("n", Node::int(0))]),
    )]);
    let ir = compile_to_ir_with_options(&tree, &closed()).unwrap();
    assert_eq!(
        ir.to_lines(),
        vec![
            "LABEL -> @L0",
            "LOAD n -> %t0",
            "IFGOTO %t0 -> @L1",
            "ENTER_SCOPE",
            "MOV #0 -> %t1",
            "= %t1 -> n",
            "EXIT_SCOPE",
            "GOTO -> @L0",
            "LABEL -> @L1",
        ]
    );
}

// ── Session properties ───────────────────────────────────────────────────

#[test]
fn independent_sessions_produce_identical_names() {
    let tree = Node::program([
        Node::declaration(TypeCode::Int, "a", Some(Node::binary(Operator::Multiply, Node::int(2), Node::int(3)))),
        Node::if_stmt(Node::variable("a"), Node::new(NodeKind::Block), None),
    ]);
    let first = lower(&tree).unwrap();
    let second = lower(&tree).unwrap();
    assert_eq!(first, second, "name counters must not leak between sessions");
}

#[test]
fn scope_markers_are_balanced() {
    let tree = Node::program([
        Node::block([Node::new(NodeKind::Block), Node::while_loop(Node::int(1), Node::new(NodeKind::Block))]),
        Node::function(TypeCode::Void, "f", &[], Node::block([Node::new(NodeKind::Block)])),
    ]);
    let ir = lower(&tree).unwrap();
    let mut depth = 0i32;
    for op in ops(&ir) {
        match op {
            Opcode::EnterScope => depth += 1,
            Opcode::ExitScope => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0, "EXIT_SCOPE before its ENTER_SCOPE");
    }
    assert_eq!(depth, 0);
}

// ── Error cases ──────────────────────────────────────────────────────────

#[test]
fn function_without_body_is_rejected_before_any_output() {
    let f = Node::new(NodeKind::FunctionDeclaration)
        .with_child(Node::type_node(TypeCode::Int))
        .with_child(Node::variable("f"))
        .with_child(Node::new(NodeKind::ParameterList));
    let mut g = Gen::new(false);
    let err = g.lower_node(&f).unwrap_err();
    assert!(matches!(err, CompileError::MalformedDeclaration(_)), "got {err:?}");
    assert!(g.out.is_empty(), "no LABEL may be emitted for a malformed function");
}

#[test]
fn unexpected_node_is_unsupported() {
    let tree = Node::program([Node::new(NodeKind::Unexpected)]);
    let err = compile_to_ir(&tree).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedConstruct(_)), "got {err:?}");
}

#[test]
fn non_arithmetic_binary_operator_is_unsupported() {
    let tree = Node::program([Node::binary(Operator::Not, Node::int(1), Node::int(2))]);
    let err = compile_to_ir(&tree).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedConstruct(_)), "got {err:?}");
}

#[test]
fn binary_missing_operand_is_malformed() {
    let node = Node::binary(Operator::Plus, Node::int(1), Node::int(2));
    let broken = Node { children: vec![Node::int(1)], ..node };
    let err = compile_to_ir(&Node::program([broken])).unwrap_err();
    assert!(
        matches!(err, CompileError::MalformedNode { kind: NodeKind::BinaryExpr, .. }),
        "got {err:?}"
    );
}

#[test]
fn array_without_size_is_malformed_declaration() {
    let arr = Node::new(NodeKind::ArrayDeclaration)
        .with_child(Node::type_node(TypeCode::Int))
        .with_child(Node::variable("a"));
    let err = compile_to_ir(&Node::program([arr])).unwrap_err();
    assert!(matches!(err, CompileError::MalformedDeclaration(_)), "got {err:?}");
}

#[test]
fn invalid_options_are_rejected() {
    let opts = CompileOptions { register_count: 0, ..Default::default() };
    let err = compile_to_ir_with_options(&Node::new(NodeKind::Program), &opts).unwrap_err();
    assert!(matches!(err, CompileError::InvalidOptions(_)), "got {err:?}");
}
