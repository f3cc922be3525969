//! Edge case and invariant tests for rill-par.

#[cfg(test)]
mod tests {
    use crate::{Ast, Expr, Parser};
    use rill_lex::Lexer;
    use rill_util::Handler;

    fn parse(source: &str) -> (Option<Ast>, usize) {
        let mut handler = Handler::new();
        let tokens: Vec<_> = Lexer::new(source, &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        let ast = parser.parse();
        (ast, handler.error_count())
    }

    #[test]
    fn test_empty_source_parses_to_empty_block() {
        let (ast, errors) = parse("");
        assert_eq!(errors, 0);
        match ast.unwrap() {
            Expr::List { elements, .. } => assert!(elements.is_empty()),
            _ => panic!("expected a block list"),
        }
    }

    #[test]
    fn test_only_newlines() {
        let (ast, errors) = parse("\n\n\n");
        assert_eq!(errors, 0);
        match ast.unwrap() {
            Expr::List { elements, .. } => assert!(elements.is_empty()),
            _ => panic!("expected a block list"),
        }
    }

    #[test]
    fn test_semicolons_are_statement_separators() {
        let (ast, errors) = parse("a = 1; b = 2; c = 3");
        assert_eq!(errors, 0);
        match ast.unwrap() {
            Expr::List { elements, .. } => assert_eq!(elements.len(), 3),
            _ => panic!("expected a block list"),
        }
    }

    #[test]
    fn test_trailing_newline_optional() {
        let (with_nl, e1) = parse("x = 1\n");
        let (without_nl, e2) = parse("x = 1");
        assert_eq!(e1, 0);
        assert_eq!(e2, 0);
        assert!(with_nl.is_some());
        assert!(without_nl.is_some());
    }

    #[test]
    fn test_consecutive_identifiers_is_syntax_error() {
        let (ast, errors) = parse("a b");
        assert!(errors > 0);
        assert!(ast.is_none());
    }

    #[test]
    fn test_unterminated_paren_is_syntax_error() {
        let (ast, errors) = parse("(1 + 2");
        assert!(errors > 0);
        assert!(ast.is_none());
    }

    #[test]
    fn test_unterminated_if_is_syntax_error() {
        let (ast, errors) = parse("if a > 1 then\n  b = 2\n");
        assert!(errors > 0);
        assert!(ast.is_none());
    }

    #[test]
    fn test_no_partial_ast_on_error() {
        let (ast, errors) = parse("a = 1\n+ + +\nb = 2");
        assert!(errors > 0);
        assert!(ast.is_none());
    }

    #[test]
    fn test_if_elif_else_inline() {
        let (ast, errors) = parse("if a then 1 elif b then 2 else 3");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_if_block_requires_end() {
        let (ast, errors) = parse("if a then\n  b = 1\nend");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_mixed_inline_and_block_branches() {
        let (ast, errors) = parse("if a then 1 else\n  b = 2\nend");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_for_loop_with_step() {
        let (ast, errors) = parse("for i = 0 to 10 step 2 then x = x + i");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_while_block() {
        let (ast, errors) = parse("while a < 10 then\n  a = a + 1\nend");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_function_arrow_form() {
        let (ast, errors) = parse("fun square(x) -> x * x");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_function_block_form() {
        let (ast, errors) = parse("fun square(x)\n  return x * x\nend");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_anonymous_function() {
        let (ast, errors) = parse("fun(x) -> x * 2");
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_deeply_nested_parens() {
        let source = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        let (ast, errors) = parse(&source);
        assert_eq!(errors, 0);
        assert!(ast.is_some());
    }

    #[test]
    fn test_invariant_totality_terminates_on_garbage_tokens() {
        let (_, _) = parse("[[[{{{(((");
    }

    #[test]
    fn test_invariant_every_node_has_nonempty_or_equal_span() {
        fn check(e: &Expr) {
            let s = e.span();
            assert!(s.start <= s.end);
        }
        let (ast, errors) = parse("a = 1 + 2 * (3 - 4)");
        assert_eq!(errors, 0);
        if let Some(Expr::List { elements, .. }) = ast {
            for e in &elements {
                check(e);
            }
        }
    }
}
