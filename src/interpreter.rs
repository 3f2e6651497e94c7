use crate::parser::{parse, Error, Expression, NumberMode, Operator};

/// Evaluation settings that the library exposes to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub number_mode: NumberMode,
}

/// Outcome of a successful line: the tree that was built and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub tree: Expression,
    pub value: f64,
}

/// Walks the tree with plain IEEE-754 arithmetic. Division by zero and the
/// square root of a negative number produce infinities and NaN, not errors.
pub fn evaluate(expression: &Expression) -> f64 {
    match expression {
        Expression::Number(value, _) => *value,
        Expression::Fold(first, rest, _) => rest
            .iter()
            .fold(evaluate(first), |lhs, (op, rhs)| apply(*op, lhs, evaluate(rhs))),
        Expression::Sqrt(arg, _) => evaluate(arg).sqrt(),
    }
}

fn apply(op: Operator, lhs: f64, rhs: f64) -> f64 {
    match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => lhs / rhs,
        Operator::Power => lhs.powf(rhs),
    }
}

/// Lexes, parses and evaluates one line. Each call starts from a fresh lexer.
pub fn evaluate_line(input: &str, options: &Options) -> Result<Evaluation, Error> {
    let tree = parse(input, options.number_mode)?;
    let value = evaluate(&tree);
    Ok(Evaluation { tree, value })
}

pub fn evaluate_str(input: &str, options: &Options) -> Result<f64, Error> {
    evaluate_line(input, options).map(|evaluation| evaluation.value)
}

pub fn format_result(value: f64) -> String {
    format!("Result: {value:.6}")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::MAX_DEPTH;

    fn eval(input: &str) -> f64 {
        match evaluate_str(input, &Options::default()) {
            Ok(value) => value,
            Err(err) => panic!("failed to evaluate \"{input}\": {err}"),
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("42"), 42.0);
        assert_eq!(eval("3.25"), 3.25);
        assert_eq!(eval(".5"), 0.5);
        assert_eq!(eval("7."), 7.0);
        assert_eq!(eval("0.1"), "0.1".parse::<f64>().unwrap());
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(eval("1.5 + 2.25"), 1.5 + 2.25);
        assert_eq!(eval("10 - 4.5"), 5.5);
        assert_eq!(eval("6 * 7"), 42.0);
        assert_eq!(eval("1 / 3"), 1.0 / 3.0);
        assert_eq!(eval("0.1 + 0.2"), 0.1 + 0.2);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1 / 0"), f64::INFINITY);
        assert!(eval("0 / 0").is_nan());
        assert_eq!(eval("5 - 6 / 0"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_power_shares_additive_level() {
        assert_eq!(eval("2 + 3 ^ 2"), 25.0);
        assert_eq!(eval("3 ^ 2 + 1"), 10.0);
        assert_eq!(eval("2 ^ 3 - 1"), 7.0);
        assert_eq!(eval("2 ^ 3 ^ 2"), 64.0);
        assert_eq!(eval("2 * 3 ^ 2"), 36.0);
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        assert_eq!(eval("2 + 3 * 4"), 14.0);
        assert_eq!(eval("8 / 2 / 2"), 2.0);
        assert_eq!(eval("10 - 2 - 3"), 5.0);
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("2 + (3 ^ 2)"), 11.0);
        assert_eq!(eval("((((1))))"), 1.0);
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(eval("sqrt(4)"), 2.0);
        assert_eq!(eval("sqrt(9) * sqrt(16)"), 12.0);
        assert_eq!(eval("sqrt(sqrt(16))"), 2.0);
        assert!(eval("sqrt(0 - 1)").is_nan());
    }

    #[test]
    fn test_idempotent() {
        let input = "sqrt(2) / 3 + 0.7 ^ 1.3";
        assert_eq!(eval(input).to_bits(), eval(input).to_bits());
    }

    #[test]
    fn test_error_does_not_poison_next_evaluation() {
        assert!(evaluate_str("2 + ", &Options::default()).is_err());
        assert_eq!(eval("2 + 2"), 4.0);
    }

    #[test]
    fn test_lenient_numbers() {
        let options = Options {
            number_mode: NumberMode::Lenient,
        };
        assert_eq!(evaluate_str(". + 1", &options), Ok(1.0));
        assert!(matches!(
            evaluate_str(". + 1", &Options::default()),
            Err(Error::NumericFormat { .. })
        ));
    }

    #[test]
    fn test_evaluate_line_keeps_tree() {
        let evaluation = evaluate_line("2 + 3 ^ 2", &Options::default()).unwrap();
        assert_eq!(evaluation.tree.to_string(), "((2 + 3) ^ 2)");
        assert_eq!(evaluation.value, 25.0);
    }

    #[test]
    fn test_long_chain() {
        let input = vec!["1"; 200_000].join("+");
        assert_eq!(eval(&input), 200_000.0);
        let input = vec!["2 * 0.5"; 100_000].join(" * ");
        assert_eq!(eval(&input), 1.0);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval(&nested(MAX_DEPTH)), 1.0);
        assert!(matches!(
            evaluate_str(&nested(MAX_DEPTH + 1), &Options::default()),
            Err(Error::NestingTooDeep { .. })
        ));
        let sqrts = format!("{}16{}", "sqrt(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(eval(&sqrts) >= 1.0);
        assert!(evaluate_str(&"(".repeat(50_000), &Options::default()).is_err());
        assert_eq!(eval("1 + 1"), 2.0);
    }

    #[test]
    fn test_format_result() {
        assert_eq!(format_result(25.0), "Result: 25.000000");
        assert_eq!(format_result(1.0 / 3.0), "Result: 0.333333");
        assert_eq!(format_result(f64::INFINITY), "Result: inf");
        assert_eq!(format_result(f64::NAN), "Result: NaN");
    }
}
