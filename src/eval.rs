use crate::parser::{BinOp, Expr};
use std::{fmt, rc::Rc};

/// Result of evaluating a program. Closures borrow the tree they came from.
#[derive(Clone, Debug)]
pub enum Value<'a> {
    Number(i64),
    Bool(bool),
    Closure {
        env: Env<'a>,
        binder: &'a str,
        body: &'a Expr,
    },
}

impl<'a> Value<'a> {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Closure { .. } => "function",
        }
    }
}

impl PartialEq for Value<'_> {
    /// Closures never compare equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Closure { binder, .. } => write!(f, "<function of {}>", binder),
        }
    }
}

/// Immutable variable bindings. Binding a name returns a new environment
/// that shares the old one; closures keep the environment they were made in.
#[derive(Clone, Debug, Default)]
pub struct Env<'a>(Option<Rc<Frame<'a>>>);

#[derive(Debug)]
struct Frame<'a> {
    name: &'a str,
    value: Value<'a>,
    parent: Env<'a>,
}

impl<'a> Env<'a> {
    pub fn bind(&self, name: &'a str, value: Value<'a>) -> Env<'a> {
        Env(Some(Rc::new(Frame {
            name,
            value,
            parent: self.clone(),
        })))
    }

    pub fn lookup(&self, name: &str) -> Option<&Value<'a>> {
        let mut env = self;
        while let Some(frame) = &env.0 {
            if frame.name == name {
                return Some(&frame.value);
            }
            env = &frame.parent;
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    UnboundVariable(String),
    TypeMismatch {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    Overflow(BinOp),
    NegativeLoopCount(i64),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundVariable(name) => write!(f, "unbound variable {}", name),
            EvalError::TypeMismatch {
                context,
                expected,
                found,
            } => write!(f, "{} expects a {}, got a {}", context, expected, found),
            EvalError::Overflow(op) => write!(f, "integer overflow in {:?}", op),
            EvalError::NegativeLoopCount(n) => write!(f, "loop count {} is negative", n),
        }
    }
}

impl std::error::Error for EvalError {}

type Result<T> = std::result::Result<T, EvalError>;

fn number(value: Value<'_>, context: &'static str) -> Result<i64> {
    match value {
        Value::Number(n) => Ok(n),
        other => Err(EvalError::TypeMismatch {
            context,
            expected: "number",
            found: other.type_name(),
        }),
    }
}

fn boolean(value: Value<'_>, context: &'static str) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::TypeMismatch {
            context,
            expected: "boolean",
            found: other.type_name(),
        }),
    }
}

fn binary<'a>(op: BinOp, left: Value<'a>, right: Value<'a>) -> Result<Value<'a>> {
    let arithmetic = |checked: fn(i64, i64) -> Option<i64>| -> Result<Value<'a>> {
        let a = number(left.clone(), "arithmetic")?;
        let b = number(right.clone(), "arithmetic")?;
        checked(a, b).map(Value::Number).ok_or(EvalError::Overflow(op))
    };
    match op {
        BinOp::Plus => arithmetic(i64::checked_add),
        BinOp::Minus => arithmetic(i64::checked_sub),
        BinOp::Times => arithmetic(i64::checked_mul),
        BinOp::Less => Ok(Value::Bool(
            number(left, "`<`")? < number(right, "`<`")?,
        )),
        BinOp::Greater => Ok(Value::Bool(
            number(left, "`>`")? > number(right, "`>`")?,
        )),
        BinOp::Equals => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a == b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
            (Value::Number(_), _) => Err(EvalError::TypeMismatch {
                context: "`==`",
                expected: "number",
                found: right.type_name(),
            }),
            (Value::Bool(_), _) => Err(EvalError::TypeMismatch {
                context: "`==`",
                expected: "boolean",
                found: right.type_name(),
            }),
            (Value::Closure { .. }, _) => Err(EvalError::TypeMismatch {
                context: "`==`",
                expected: "number or boolean",
                found: left.type_name(),
            }),
        },
    }
}

/// Evaluates `expr` with the variables of `env` in scope.
pub fn eval<'a>(env: &Env<'a>, expr: &'a Expr) -> Result<Value<'a>> {
    Ok(match expr {
        Expr::Number(n) => Value::Number(*n),
        Expr::Bool(b) => Value::Bool(*b),
        Expr::Var(name) => env
            .lookup(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable(name.clone()))?,
        Expr::Lambda { binder, body } => Value::Closure {
            env: env.clone(),
            binder,
            body,
        },
        Expr::App { func, arg } => match eval(env, func)? {
            Value::Closure {
                env: closure_env,
                binder,
                body,
            } => {
                let arg = eval(env, arg)?;
                eval(&closure_env.bind(binder, arg), body)?
            }
            other => {
                return Err(EvalError::TypeMismatch {
                    context: "application",
                    expected: "function",
                    found: other.type_name(),
                })
            }
        },
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            if boolean(eval(env, condition)?, "`if`")? {
                eval(env, then_branch)?
            } else {
                eval(env, else_branch)?
            }
        }
        Expr::Binary { op, left, right } => binary(*op, eval(env, left)?, eval(env, right)?)?,
        Expr::Not(inner) => Value::Bool(!boolean(eval(env, inner)?, "`!`")?),
        Expr::Let {
            binder,
            value,
            body,
        } => {
            let value = eval(env, value)?;
            eval(&env.bind(binder, value), body)?
        }
        Expr::Assign {
            binder,
            value,
            rest,
        } => {
            let value = eval(env, value)?;
            eval(&env.bind(binder, value), rest)?
        }
        Expr::Loop {
            count,
            accumulator,
            body,
        } => {
            let count = number(eval(env, count)?, "`loop`")?;
            if count < 0 {
                return Err(EvalError::NegativeLoopCount(count));
            }
            let mut value = env
                .lookup(accumulator)
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(accumulator.clone()))?;
            for _ in 0..count {
                value = eval(&env.bind(accumulator, value), body)?;
            }
            value
        }
    })
}

/// Evaluates a whole program in an empty environment.
pub fn run(program: &Expr) -> Result<Value<'_>> {
    eval(&Env::default(), program)
}
