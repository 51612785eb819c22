use inspector_bridge::scopes;

// Helper to check that the braces between a scope's indexes balance
fn is_balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for ch in text.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

#[cfg(test)]
mod scope_tests {
    use super::*;

    #[test]
    fn test_single_function_enclosing_scope() {
        let source = "function foo(){\n  return 1;\n}\n";

        // Any line inside the function resolves to its start/end lines
        for line in 0..=2 {
            let scope = scopes::enclosing_scope(source, line);
            assert_eq!(
                scope,
                Some((0, 2)),
                "line {} should resolve to the single function's scope",
                line
            );
        }
    }

    #[test]
    fn test_no_enclosing_scope_is_none() {
        let source = "var x = 1;\nfunction foo(){\n  return x;\n}\nvar y = 2;\n";

        assert_eq!(
            scopes::enclosing_scope(source, 0),
            None,
            "line before any function should have no enclosing scope"
        );
        assert_eq!(
            scopes::enclosing_scope(source, 4),
            None,
            "line after the function body should have no enclosing scope"
        );
        assert_eq!(
            scopes::enclosing_scope(source, 2),
            Some((1, 3)),
            "line inside the function should resolve"
        );
    }

    #[test]
    fn test_disjoint_functions_have_balanced_scopes() {
        let source = "\
function one(){\n  var a = 1;\n}\n\
function two(){\n  var b = 2;\n}\n\
function three(){\n  var c = 3;\n}\n";

        let pairs = scopes::function_scopes(source);
        assert_eq!(pairs.len(), 3, "should find exactly 3 function scopes");

        for (start, end) in &pairs {
            let end = end.expect("disjoint functions should all balance");
            assert!(
                is_balanced(&source[*start..=end]),
                "scope text should have balanced braces"
            );
        }
    }

    #[test]
    fn test_nested_function_prefers_innermost_start() {
        let source = "\
function outer(){\n\
  function inner(){\n\
    return 1;\n\
  }\n\
  return inner();\n\
}\n";

        let scope = scopes::enclosing_scope(source, 2).expect("line 2 is inside both functions");
        assert_eq!(scope.0, 1, "latest-starting candidate should win");
        assert_eq!(scope.1, 3, "inner function ends on line 3");

        let outer = scopes::enclosing_scope(source, 4).expect("line 4 is only inside outer");
        assert_eq!(outer, (0, 5));
    }

    #[test]
    fn test_unbalanced_scope_is_recorded_as_open() {
        let source = "function broken(){\n  return 1;\n";
        let pairs = scopes::function_scopes(source);
        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs.values().next(),
            Some(&None),
            "a scope whose braces never balance should stay open, not panic"
        );
    }

    #[test]
    fn test_enclosing_function_name() {
        let source = "function compute(a, b){\n  return a + b;\n}\n";
        assert_eq!(
            scopes::enclosing_function_name(source, 1).as_deref(),
            Some("compute")
        );
    }

    #[test]
    fn test_anonymous_function_has_no_name() {
        let source = "var f = function (){\n  return 1;\n};\n";
        assert_eq!(
            scopes::enclosing_function_name(source, 1),
            None,
            "anonymous functions yield no usable name"
        );
    }

    #[test]
    fn test_multiple_functions_on_one_line() {
        let source = "function a(){ return 1; } function b(){\n  return 2;\n}\n";
        let lines = scopes::line_scopes(source);
        let ends = lines.get(&0).expect("both scopes start on line 0");
        assert_eq!(ends.len(), 2, "one start line should map to two end lines");
    }

    #[test]
    fn test_column_counting_tabs_as_four() {
        assert_eq!(scopes::column_of("\tif {", '{'), 7, "tab + 'if ' = 4 + 3");
        assert_eq!(scopes::column_of("ab{", '{'), 2);
        assert_eq!(
            scopes::column_of("no brace here", '{'),
            13,
            "missing target yields the full line width"
        );
    }

    #[test]
    fn test_first_code_line_skips_blanks_and_comments() {
        let source = "\n// header\n/* block */\n\nvar x = 1;\n";
        assert_eq!(scopes::first_code_line(source), Some(4));
        assert_eq!(scopes::first_code_line("\n\n"), None);
    }

    #[test]
    fn test_line_and_column_primitives() {
        let source = "function f(){\n\treturn 1;\n}\n";
        assert_eq!(scopes::line_of_index(source, 0), 0);
        assert_eq!(scopes::line_of_index(source, 15), 1);
        assert_eq!(scopes::line_count(source), 3);
        assert_eq!(
            scopes::start_column_for_line(source, 1),
            4,
            "a leading tab is 4 columns"
        );
        assert_eq!(scopes::last_column(source), 1);
        assert_eq!(scopes::line_width("\tab"), 6);
    }

    #[test]
    fn test_has_functions() {
        assert!(scopes::has_functions("function f(){}"));
        assert!(!scopes::has_functions("var x = 1;"));
    }
}
