// tests/parser_tests.rs

use varsift::ast::{ArithOp, CmpOp, Expr, LogicOp, PathIndex, Quantifier, UnaryOp};
use varsift::lexer::Lexer;
use varsift::parser::{ParseError, Parser};

fn parse(input: &str) -> Expr {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer).expect("lex error on first token");
    parser.parse().expect("parse error")
}

fn parse_err(input: &str) -> ParseError {
    let lexer = Lexer::new(input);
    match Parser::new(lexer) {
        Ok(mut parser) => parser.parse().expect_err("expected a parse error"),
        Err(e) => e,
    }
}

// ============================================================================
// Literals and primaries
// ============================================================================

#[test]
fn test_parse_integer() {
    assert!(matches!(parse("42"), Expr::Int(42)));
}

#[test]
fn test_parse_float() {
    assert!(matches!(parse("0.05"), Expr::Float(n) if (n - 0.05).abs() < 1e-12));
}

#[test]
fn test_parse_string() {
    assert!(matches!(parse("'PASS'"), Expr::Str(s) if s == "PASS"));
}

#[test]
fn test_parse_bool() {
    assert!(matches!(parse("true"), Expr::Bool(true)));
    assert!(matches!(parse("false"), Expr::Bool(false)));
}

#[test]
fn test_parse_field_reference() {
    assert!(matches!(parse("DP"), Expr::Field(name) if name == "DP"));
}

#[test]
fn test_parse_parenthesized() {
    assert!(matches!(parse("(5)"), Expr::Int(5)));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    // 1 + 2 * 3 => Add(1, Mul(2, 3))
    match parse("1 + 2 * 3") {
        Expr::Arith {
            op: ArithOp::Add,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Int(1)));
            assert!(matches!(
                *right,
                Expr::Arith {
                    op: ArithOp::Mul,
                    ..
                }
            ));
        }
        other => panic!("Expected Add, got {:?}", other),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    // (1 + 2) * 3 => Mul(Add(1, 2), 3)
    match parse("(1 + 2) * 3") {
        Expr::Arith {
            op: ArithOp::Mul,
            left,
            right,
        } => {
            assert!(matches!(
                *left,
                Expr::Arith {
                    op: ArithOp::Add,
                    ..
                }
            ));
            assert!(matches!(*right, Expr::Int(3)));
        }
        other => panic!("Expected Mul, got {:?}", other),
    }
}

#[test]
fn test_left_associativity() {
    // 1 - 2 - 3 => Sub(Sub(1, 2), 3)
    match parse("1 - 2 - 3") {
        Expr::Arith {
            op: ArithOp::Sub,
            left,
            right,
        } => {
            assert!(matches!(*right, Expr::Int(3)));
            assert!(matches!(
                *left,
                Expr::Arith {
                    op: ArithOp::Sub,
                    ..
                }
            ));
        }
        other => panic!("Expected Sub, got {:?}", other),
    }
}

#[test]
fn test_comparison_binds_tighter_than_logic() {
    // DP > 10 & AF < 0.5 => And(Gt, Lt)
    match parse("DP > 10 & AF < 0.5") {
        Expr::Logic {
            op: LogicOp::And,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Cmp { op: CmpOp::Gt, .. }));
            assert!(matches!(*right, Expr::Cmp { op: CmpOp::Lt, .. }));
        }
        other => panic!("Expected And, got {:?}", other),
    }
}

#[test]
fn test_equals_spellings_are_synonyms() {
    assert!(matches!(
        parse("FILTER = 'PASS'"),
        Expr::Cmp { op: CmpOp::Eq, .. }
    ));
    assert!(matches!(
        parse("FILTER == 'PASS'"),
        Expr::Cmp { op: CmpOp::Eq, .. }
    ));
}

// The prefix operators deliberately bind looser than arithmetic and
// comparison, exactly as the original grammar has it.

#[test]
fn test_unary_minus_absorbs_addition() {
    // -2 + 3 => Neg(Add(2, 3))
    match parse("-2 + 3") {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => {
            assert!(matches!(
                *operand,
                Expr::Arith {
                    op: ArithOp::Add,
                    ..
                }
            ));
        }
        other => panic!("Expected Neg, got {:?}", other),
    }
}

#[test]
fn test_not_absorbs_comparison() {
    // !FILTER = 'PASS' => Not(Eq(FILTER, 'PASS'))
    match parse("!FILTER = 'PASS'") {
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => {
            assert!(matches!(*operand, Expr::Cmp { op: CmpOp::Eq, .. }));
        }
        other => panic!("Expected Not, got {:?}", other),
    }
}

#[test]
fn test_not_stops_before_logic() {
    // !A && B => And(Not(A), B)
    match parse("!A && B") {
        Expr::Logic {
            op: LogicOp::AndAnd,
            left,
            ..
        } => {
            assert!(matches!(
                *left,
                Expr::Unary {
                    op: UnaryOp::Not,
                    ..
                }
            ));
        }
        other => panic!("Expected AndAnd, got {:?}", other),
    }
}

#[test]
fn test_exists_absorbs_logic() {
    // exists A && B => Exists(And(A, B))
    match parse("exists A && B") {
        Expr::Exists {
            negated: false,
            operand,
        } => {
            assert!(matches!(
                *operand,
                Expr::Logic {
                    op: LogicOp::AndAnd,
                    ..
                }
            ));
        }
        other => panic!("Expected Exists, got {:?}", other),
    }
}

#[test]
fn test_na_is_negated_exists() {
    assert!(matches!(
        parse("na AF"),
        Expr::Exists { negated: true, .. }
    ));
}

// ============================================================================
// Ternary
// ============================================================================

#[test]
fn test_ternary() {
    match parse("DP > 10 ? 1 : 2") {
        Expr::Cond {
            cond,
            then_branch,
            else_branch,
        } => {
            assert!(matches!(*cond, Expr::Cmp { op: CmpOp::Gt, .. }));
            assert!(matches!(*then_branch, Expr::Int(1)));
            assert!(matches!(*else_branch, Expr::Int(2)));
        }
        other => panic!("Expected Cond, got {:?}", other),
    }
}

#[test]
fn test_ternary_chain_groups_left() {
    // The else branch re-enters one level tighter, so a chain nests in the
    // condition: a ? b : c ? d : e => Cond(Cond(a, b, c), d, e)
    match parse("A ? 1 : 2 ? 3 : 4") {
        Expr::Cond { cond, .. } => {
            assert!(matches!(*cond, Expr::Cond { .. }));
        }
        other => panic!("Expected Cond, got {:?}", other),
    }
}

// ============================================================================
// Indexed and quantified access
// ============================================================================

#[test]
fn test_simple_index() {
    match parse("AC[0]") {
        Expr::Index { base, index } => {
            assert!(matches!(*base, Expr::Field(name) if name == "AC"));
            assert!(matches!(*index, Expr::Int(0)));
        }
        other => panic!("Expected Index, got {:?}", other),
    }
}

#[test]
fn test_computed_index() {
    match parse("AC[i + 1]") {
        Expr::Index { index, .. } => {
            assert!(matches!(
                *index,
                Expr::Arith {
                    op: ArithOp::Add,
                    ..
                }
            ));
        }
        other => panic!("Expected Index, got {:?}", other),
    }
}

#[test]
fn test_field_path_concrete_index() {
    match parse("GEN[0].DP") {
        Expr::FieldPath { base, index, path } => {
            assert!(matches!(*base, Expr::Field(name) if name == "GEN"));
            assert!(matches!(index, PathIndex::At(e) if matches!(*e, Expr::Int(0))));
            assert!(matches!(*path, Expr::Field(name) if name == "DP"));
        }
        other => panic!("Expected FieldPath, got {:?}", other),
    }
}

#[test]
fn test_field_path_with_sub_index() {
    // GEN[1].AD[0] => FieldPath(GEN, 1, Index(AD, 0))
    match parse("GEN[1].AD[0]") {
        Expr::FieldPath { path, .. } => {
            assert!(matches!(*path, Expr::Index { .. }));
        }
        other => panic!("Expected FieldPath, got {:?}", other),
    }
}

#[test]
fn test_quantified_field_path() {
    match parse("GEN[ANY].DP") {
        Expr::FieldPath { index, .. } => {
            assert!(matches!(index, PathIndex::Quant(Quantifier::Any)));
        }
        other => panic!("Expected FieldPath, got {:?}", other),
    }
    match parse("GEN[ALL].DP") {
        Expr::FieldPath { index, .. } => {
            assert!(matches!(index, PathIndex::Quant(Quantifier::All)));
        }
        other => panic!("Expected FieldPath, got {:?}", other),
    }
}

#[test]
fn test_wildcard_spellings() {
    // '*' is a spelling of ANY, '?' of ALL
    match parse("GEN[*].DP") {
        Expr::FieldPath { index, .. } => {
            assert!(matches!(index, PathIndex::Quant(Quantifier::Any)));
        }
        other => panic!("Expected FieldPath, got {:?}", other),
    }
    match parse("GEN[?].DP") {
        Expr::FieldPath { index, .. } => {
            assert!(matches!(index, PathIndex::Quant(Quantifier::All)));
        }
        other => panic!("Expected FieldPath, got {:?}", other),
    }
}

#[test]
fn test_bare_wildcard_index() {
    // a wildcard with no field path is a plain index with a wildcard literal
    match parse("X[ANY]") {
        Expr::Index { index, .. } => {
            assert!(matches!(*index, Expr::IndexLiteral(Quantifier::Any)));
        }
        other => panic!("Expected Index, got {:?}", other),
    }
}

#[test]
fn test_quantified_access_inside_comparison() {
    match parse("GEN[ANY].DP > 10") {
        Expr::Cmp {
            op: CmpOp::Gt,
            left,
            ..
        } => {
            assert!(matches!(*left, Expr::FieldPath { .. }));
        }
        other => panic!("Expected Cmp, got {:?}", other),
    }
}

// ============================================================================
// Set membership
// ============================================================================

#[test]
fn test_set_membership() {
    match parse("CHROM in SET['chr1', 'chr2', 'chrX']") {
        Expr::InSet { value, elements } => {
            assert!(matches!(*value, Expr::Field(name) if name == "CHROM"));
            assert_eq!(elements.len(), 3);
        }
        other => panic!("Expected InSet, got {:?}", other),
    }
}

#[test]
fn test_set_membership_binds_looser_than_comparison() {
    // DP + 1 in SET[2, 3] => InSet(Add(DP, 1), [2, 3])
    match parse("DP + 1 in SET[2, 3]") {
        Expr::InSet { value, .. } => {
            assert!(matches!(
                *value,
                Expr::Arith {
                    op: ArithOp::Add,
                    ..
                }
            ));
        }
        other => panic!("Expected InSet, got {:?}", other),
    }
}

// ============================================================================
// Function calls
// ============================================================================

#[test]
fn test_function_call() {
    match parse("size(AC)") {
        Expr::Call { name, args } => {
            assert_eq!(name, "size");
            assert_eq!(args.len(), 1);
        }
        other => panic!("Expected Call, got {:?}", other),
    }
}

#[test]
fn test_function_call_no_args() {
    match parse("now()") {
        Expr::Call { name, args } => {
            assert_eq!(name, "now");
            assert!(args.is_empty());
        }
        other => panic!("Expected Call, got {:?}", other),
    }
}

#[test]
fn test_function_call_multiple_args() {
    match parse("f(1, DP, 'x')") {
        Expr::Call { args, .. } => {
            assert_eq!(args.len(), 3);
        }
        other => panic!("Expected Call, got {:?}", other),
    }
}

// ============================================================================
// Error cases
// ============================================================================

#[test]
fn test_truncated_expression_fails() {
    let err = parse_err("1 + ");
    assert!(matches!(err, ParseError::Syntax(_)));
}

#[test]
fn test_unclosed_parenthesis_fails() {
    assert!(matches!(parse_err("(1 + 2"), ParseError::Syntax(_)));
}

#[test]
fn test_unclosed_bracket_fails() {
    assert!(matches!(parse_err("GEN[0"), ParseError::Syntax(_)));
}

#[test]
fn test_trailing_input_fails() {
    let err = parse_err("DP > 10 20");
    match err {
        ParseError::Syntax(e) => {
            assert_eq!(e.expected, "end of input");
            assert_eq!(e.offset, 8);
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_missing_ternary_colon_fails() {
    assert!(matches!(parse_err("A ? 1 2"), ParseError::Syntax(_)));
}

#[test]
fn test_set_without_keyword_fails() {
    assert!(matches!(parse_err("DP in [1, 2]"), ParseError::Syntax(_)));
}

#[test]
fn test_lex_error_surfaces_through_parser() {
    assert!(matches!(parse_err("DP > 'oops"), ParseError::Lex(_)));
}
