//! Expression parsing and evaluation
//!
//! String-valued parameter definitions and queries such as `"x^2 + y"` are
//! compiled by this module into an [`Expression`] tree, which is evaluated
//! against any [`EvaluationContext`] providing scaled variable values.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/") unary)*
//! unary   := ("-" | "+") unary | power
//! power   := primary (("^" | "**") unary)?
//! primary := number | call | identifier | "(" expr ")"
//! ```

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, map_res, not, opt, recognize, value},
    multi::{fold_many0, many0, separated_list0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated},
    IResult, Parser,
};
use std::collections::HashMap;
use thiserror::Error;

/// Error that can occur during expression parsing or evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression: {message}")]
    ParseError { message: String },

    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },
}

/// Result type for expression evaluation
type ExprResult<T> = Result<T, ExpressionError>;

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant number
    Number(f64),

    /// Variable reference
    Variable(String),

    /// Unary operations
    Unary(UnaryOp, Box<Expression>),

    /// Binary operations
    Binary(BinaryOp, Box<Expression>, Box<Expression>),

    /// Function call
    Function(String, Vec<Expression>),
}

/// Unary operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
}

/// Binary operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Power (`^` or `**`)
    Pow,
}

/// Context for expression evaluation, providing variable values
pub trait EvaluationContext {
    /// Get the value of a variable
    fn get_variable(&self, name: &str) -> ExprResult<f64>;

    /// Check if a variable exists
    fn has_variable(&self, name: &str) -> bool;

    /// Get the names of all variables
    fn variable_names(&self) -> Vec<String>;
}

impl EvaluationContext for HashMap<String, f64> {
    fn get_variable(&self, name: &str) -> ExprResult<f64> {
        self.get(name)
            .copied()
            .ok_or_else(|| ExpressionError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    fn has_variable(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn variable_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

impl Expression {
    /// Parse an expression from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use scaled_params::parameters::Expression;
    /// use std::collections::HashMap;
    ///
    /// let expr = Expression::parse("_x**2 + y / 2").unwrap();
    /// assert_eq!(expr.variables(), vec!["_x".to_string(), "y".to_string()]);
    ///
    /// let mut vars = HashMap::new();
    /// vars.insert("_x".to_string(), 3.0);
    /// vars.insert("y".to_string(), 4.0);
    /// assert_eq!(expr.evaluate(&vars).unwrap(), 11.0);
    /// ```
    pub fn parse(input: &str) -> ExprResult<Self> {
        match expr_parser(input.trim()) {
            Ok((remainder, expr)) => {
                if remainder.trim().is_empty() {
                    Ok(expr)
                } else {
                    Err(ExpressionError::ParseError {
                        message: format!("Unexpected trailing characters: '{}'", remainder),
                    })
                }
            }
            Err(e) => Err(ExpressionError::ParseError {
                message: format!("{:?}", e),
            }),
        }
    }

    /// Evaluate the expression with the given context
    pub fn evaluate<C: EvaluationContext + ?Sized>(&self, context: &C) -> ExprResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),

            Self::Variable(name) => context.get_variable(name),

            Self::Unary(UnaryOp::Neg, expr) => Ok(-expr.evaluate(context)?),

            Self::Binary(op, left, right) => {
                let lhs = left.evaluate(context)?;
                let rhs = right.evaluate(context)?;

                match op {
                    BinaryOp::Add => Ok(lhs + rhs),
                    BinaryOp::Sub => Ok(lhs - rhs),
                    BinaryOp::Mul => Ok(lhs * rhs),
                    BinaryOp::Div => {
                        if rhs == 0.0 {
                            Err(ExpressionError::DivisionByZero)
                        } else {
                            Ok(lhs / rhs)
                        }
                    }
                    BinaryOp::Pow => Ok(lhs.powf(rhs)),
                }
            }

            Self::Function(name, args) => {
                let evaluated = args
                    .iter()
                    .map(|arg| arg.evaluate(context))
                    .collect::<ExprResult<Vec<f64>>>()?;
                call(name, &evaluated)
            }
        }
    }

    /// Find all variable names used in the expression, sorted and deduplicated
    pub fn variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => vars.push(name.clone()),
            Self::Unary(_, expr) => expr.collect_variables(vars),
            Self::Binary(_, left, right) => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
            Self::Function(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// Whether the expression is a single bare identifier
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }
}

fn unary_function(name: &str) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match name {
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "asin" => f64::asin,
        "acos" => f64::acos,
        "atan" => f64::atan,
        "sinh" => f64::sinh,
        "cosh" => f64::cosh,
        "tanh" => f64::tanh,
        "exp" => f64::exp,
        "log" | "ln" => f64::ln,
        "log10" => f64::log10,
        "sqrt" => f64::sqrt,
        "abs" => f64::abs,
        _ => return None,
    };
    Some(f)
}

fn call(name: &str, args: &[f64]) -> ExprResult<f64> {
    if let Some(f) = unary_function(name) {
        return match args {
            [x] => Ok(f(*x)),
            _ => Err(ExpressionError::InvalidOperation {
                message: format!("{}() requires 1 argument, got {}", name, args.len()),
            }),
        };
    }

    let fold: fn(f64, f64) -> f64 = match name {
        "max" => f64::max,
        "min" => f64::min,
        _ => {
            return Err(ExpressionError::UndefinedFunction {
                name: name.to_string(),
            })
        }
    };
    match args.split_first() {
        Some((first, rest)) => Ok(rest.iter().copied().fold(*first, fold)),
        None => Err(ExpressionError::InvalidOperation {
            message: format!("{}() requires at least 1 argument", name),
        }),
    }
}

// Parser functions using nom

/// Parse an identifier (variable or function name)
fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        str::to_string,
    )
    .parse(input)
}

/// Parse a number
fn number(input: &str) -> IResult<&str, Expression> {
    map(map_res(recognize_float, str::parse::<f64>), Expression::Number).parse(input)
}

/// Parse a function call with a possibly empty argument list
fn function_call(input: &str) -> IResult<&str, Expression> {
    let (input, name) = identifier(input)?;
    let (input, args) = delimited(
        preceded(multispace0, char('(')),
        separated_list0(delimited(multispace0, char(','), multispace0), expr_parser),
        preceded(multispace0, char(')')),
    )
    .parse(input)?;
    Ok((input, Expression::Function(name, args)))
}

/// Parse a parenthesized expression
fn parens(input: &str) -> IResult<&str, Expression> {
    delimited(char('('), expr_parser, preceded(multispace0, char(')'))).parse(input)
}

/// Parse a primary expression (number, function call, variable, or parenthesized expression)
fn primary(input: &str) -> IResult<&str, Expression> {
    alt((
        number,
        function_call,
        map(identifier, Expression::Variable),
        parens,
    ))
    .parse(input)
}

/// Parse a power expression; the exponent may itself carry a sign
fn power(input: &str) -> IResult<&str, Expression> {
    let (input, base) = primary(input)?;
    let (input, exponent) = opt(preceded(
        delimited(multispace0, alt((tag("**"), tag("^"))), multispace0),
        unary,
    ))
    .parse(input)?;

    let expr = match exponent {
        Some(exponent) => Expression::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)),
        None => base,
    };
    Ok((input, expr))
}

/// Parse a signed expression (-expr, +expr)
fn unary(input: &str) -> IResult<&str, Expression> {
    preceded(
        multispace0,
        alt((
            map(preceded(char('-'), unary), |expr| {
                Expression::Unary(UnaryOp::Neg, Box::new(expr))
            }),
            preceded(char('+'), unary),
            power,
        )),
    )
    .parse(input)
}

/// Parse a multiplicative expression, folding left
fn term(input: &str) -> IResult<&str, Expression> {
    let (input, first) = unary(input)?;
    fold_many0(
        pair(
            delimited(
                multispace0,
                alt((
                    value(BinaryOp::Mul, terminated(char('*'), not(char('*')))),
                    value(BinaryOp::Div, char('/')),
                )),
                multispace0,
            ),
            unary,
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expression::Binary(op, Box::new(lhs), Box::new(rhs)),
    )
    .parse(input)
}

/// Parse an additive expression, folding left
fn expr_parser(input: &str) -> IResult<&str, Expression> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(
            delimited(
                multispace0,
                alt((
                    value(BinaryOp::Add, char('+')),
                    value(BinaryOp::Sub, char('-')),
                )),
                multispace0,
            ),
            term,
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expression::Binary(op, Box::new(lhs), Box::new(rhs)),
    )
    .parse(input)
}
