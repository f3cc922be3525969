//! The tree-walking evaluator.
//!
//! [`Evaluator::eval`] is a single recursive visitor over [`Expr`]. Non-local
//! control flow (`return`/`break`/`continue`) is threaded through three
//! `bool` flags rather than Rust's `Result` error channel, since it isn't an
//! error - the flags are checked after every sub-evaluation that could have
//! set them and cleared at the boundary that handles them (a loop iteration
//! for break/continue, a call frame for return).

use crate::error::{EvalResult, Frame, RuntimeError};
use crate::scope::{Scope, ScopeRef};
use crate::value::{FunctionValue, Number, Value};
use rill_par::{BinOpKind, Expr, IfCase, UnOpKind};
use rill_util::Span;
use std::rc::Rc;

pub struct Evaluator {
    is_returning: bool,
    is_breaking: bool,
    is_continuing: bool,
    call_depth: usize,
}

/// Calls nested this deep are almost certainly unbounded recursion rather
/// than a legitimate program; bail out with a `Runtime` error instead of
/// letting the host process blow its native stack.
const MAX_CALL_DEPTH: usize = 2000;

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            is_returning: false,
            is_breaking: false,
            is_continuing: false,
            call_depth: 0,
        }
    }

    /// A fresh scope rooted at and pre-populated by [`crate::builtins::install`].
    pub fn root_scope() -> ScopeRef {
        let scope = Scope::root();
        crate::builtins::install(&scope);
        scope
    }

    fn pending_control_flow(&self) -> bool {
        self.is_returning || self.is_breaking || self.is_continuing
    }

    pub fn eval(&mut self, expr: &Expr, scope: &ScopeRef) -> EvalResult {
        match expr {
            Expr::Int(n, _) => Ok(Value::int(*n)),
            Expr::Float(f, _) => Ok(Value::float(*f)),
            Expr::Str(s, _) => Ok(Value::string(s.as_str())),

            Expr::List { elements, is_block_statements, .. } => {
                if *is_block_statements {
                    self.eval_block(elements, scope)
                } else {
                    self.eval_list_literal(elements, scope)
                }
            }

            Expr::Map { pairs, span } => self.eval_map_literal(pairs, *span, scope),

            Expr::VarAccess { name, span } => scope
                .borrow()
                .get(*name)
                .ok_or_else(|| RuntimeError::new(format!("'{}' is not defined", name.as_str()), *span)),

            Expr::VarAssign { name, value, .. } => {
                let value = self.eval(value, scope)?;
                if !self.pending_control_flow() {
                    scope.borrow_mut().set(*name, value.clone());
                }
                Ok(value)
            }

            Expr::VarIndexAssign { collection, index, value, span } => {
                self.eval_index_assign(collection, index, value, *span, scope)
            }

            Expr::BinOp { op, left, right, span } => self.eval_binop(*op, left, right, *span, scope),

            Expr::UnaryOp { op, operand, span } => {
                let value = self.eval(operand, scope)?;
                if self.pending_control_flow() {
                    return Ok(value);
                }
                match op {
                    UnOpKind::Plus => Ok(value),
                    UnOpKind::Minus => value.negate(*span),
                    UnOpKind::Not => value.not(*span),
                }
            }

            Expr::If { cases, else_body, .. } => self.eval_if(cases, else_body, scope),

            Expr::For { var_name, start, end, step, body, is_block, span } => {
                self.eval_for(*var_name, start, end, step.as_deref(), body, *is_block, *span, scope)
            }

            Expr::While { cond, body, is_block, .. } => self.eval_while(cond, body, *is_block, scope),

            Expr::FuncDef { name, arg_names, body, .. } => Ok(Value::Function(Rc::new(FunctionValue {
                name: *name,
                arg_names: arg_names.clone(),
                body: Rc::new((**body).clone()),
                captured_scope: scope.clone(),
            }))),

            Expr::Call { callee, args, span } => self.eval_call(callee, args, *span, scope),

            Expr::Index { collection, index, span } => {
                let collection = self.eval(collection, scope)?;
                if self.pending_control_flow() {
                    return Ok(collection);
                }
                let index = self.eval(index, scope)?;
                if self.pending_control_flow() {
                    return Ok(index);
                }
                collection.index_access(&index, *span)
            }

            Expr::Return { value, span } => {
                let result = match value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => Value::Null,
                };
                if !self.pending_control_flow() {
                    self.is_returning = true;
                }
                let _ = span;
                Ok(result)
            }

            Expr::Break(_) => {
                self.is_breaking = true;
                Ok(Value::Null)
            }

            Expr::Continue(_) => {
                self.is_continuing = true;
                Ok(Value::Null)
            }
        }
    }

    fn eval_block(&mut self, elements: &[Expr], scope: &ScopeRef) -> EvalResult {
        let mut result = Value::Null;
        for element in elements {
            result = self.eval(element, scope)?;
            if self.pending_control_flow() {
                return Ok(result);
            }
        }
        Ok(result)
    }

    fn eval_list_literal(&mut self, elements: &[Expr], scope: &ScopeRef) -> EvalResult {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let value = self.eval(element, scope)?;
            if self.pending_control_flow() {
                return Ok(value);
            }
            values.push(value);
        }
        Ok(Value::list(values))
    }

    fn eval_map_literal(&mut self, pairs: &[(Expr, Expr)], span: Span, scope: &ScopeRef) -> EvalResult {
        let mut map = indexmap::IndexMap::new();
        for (key_expr, value_expr) in pairs {
            let key_value = self.eval(key_expr, scope)?;
            if self.pending_control_flow() {
                return Ok(key_value);
            }
            let value = self.eval(value_expr, scope)?;
            if self.pending_control_flow() {
                return Ok(value);
            }
            let key = crate::value::MapKey::try_from_value(&key_value, span)?;
            map.insert(key, value);
        }
        Ok(Value::map(map))
    }

    fn eval_index_assign(
        &mut self,
        collection: &Expr,
        index: &Expr,
        value: &Expr,
        span: Span,
        scope: &ScopeRef,
    ) -> EvalResult {
        let collection_value = self.eval(collection, scope)?;
        if self.pending_control_flow() {
            return Ok(collection_value);
        }
        let index_value = self.eval(index, scope)?;
        if self.pending_control_flow() {
            return Ok(index_value);
        }
        let value = self.eval(value, scope)?;
        if self.pending_control_flow() {
            return Ok(value);
        }
        collection_value.index_assign(&index_value, value.clone(), span)?;
        Ok(value)
    }

    /// `and`/`or` short-circuit *by value*, not just by truth: `a and b`
    /// evaluates to `b` when `a` is truthy, and to `a` itself otherwise - so
    /// this can't be a generic [`Value`] method, only the evaluator knows
    /// whether it's allowed to skip evaluating the right side.
    fn eval_binop(&mut self, op: BinOpKind, left: &Expr, right: &Expr, span: Span, scope: &ScopeRef) -> EvalResult {
        match op {
            BinOpKind::And => {
                let l = self.eval(left, scope)?;
                if self.pending_control_flow() {
                    return Ok(l);
                }
                if !l.is_truthy() {
                    Ok(l)
                } else {
                    self.eval(right, scope)
                }
            }
            BinOpKind::Or => {
                let l = self.eval(left, scope)?;
                if self.pending_control_flow() {
                    return Ok(l);
                }
                if l.is_truthy() {
                    Ok(l)
                } else {
                    self.eval(right, scope)
                }
            }
            _ => {
                let l = self.eval(left, scope)?;
                if self.pending_control_flow() {
                    return Ok(l);
                }
                let r = self.eval(right, scope)?;
                if self.pending_control_flow() {
                    return Ok(r);
                }
                match op {
                    BinOpKind::Add => l.add(&r, span),
                    BinOpKind::Sub => l.sub(&r, span),
                    BinOpKind::Mul => l.mul(&r, span),
                    BinOpKind::Div => l.div(&r, span),
                    BinOpKind::Pow => l.pow(&r, span),
                    BinOpKind::Ee => Ok(Value::int(l.equals(&r) as i64)),
                    BinOpKind::Ne => Ok(Value::int(!l.equals(&r) as i64)),
                    BinOpKind::Lt => Ok(Value::int((l.compare(&r, span)? == std::cmp::Ordering::Less) as i64)),
                    BinOpKind::Lte => Ok(Value::int((l.compare(&r, span)? != std::cmp::Ordering::Greater) as i64)),
                    BinOpKind::Gt => Ok(Value::int((l.compare(&r, span)? == std::cmp::Ordering::Greater) as i64)),
                    BinOpKind::Gte => Ok(Value::int((l.compare(&r, span)? != std::cmp::Ordering::Less) as i64)),
                    BinOpKind::And | BinOpKind::Or => unreachable!("handled above"),
                }
            }
        }
    }

    fn eval_if(&mut self, cases: &[IfCase], else_body: &Option<Box<Expr>>, scope: &ScopeRef) -> EvalResult {
        for case in cases {
            let cond = self.eval(&case.cond, scope)?;
            if self.pending_control_flow() {
                return Ok(cond);
            }
            if cond.is_truthy() {
                return self.eval(&case.body, scope);
            }
        }
        match else_body {
            Some(body) => self.eval(body, scope),
            None => Ok(Value::Null),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_for(
        &mut self,
        var_name: rill_util::Symbol,
        start: &Expr,
        end: &Expr,
        step: Option<&Expr>,
        body: &Expr,
        is_block: bool,
        span: Span,
        scope: &ScopeRef,
    ) -> EvalResult {
        let start_value = self.eval_to_number(start, scope)?;
        if self.pending_control_flow() {
            return Ok(Value::Number(start_value));
        }
        let end_value = self.eval_to_number(end, scope)?;
        if self.pending_control_flow() {
            return Ok(Value::Number(end_value));
        }
        let step_value = match step {
            Some(expr) => {
                let v = self.eval_to_number(expr, scope)?;
                if self.pending_control_flow() {
                    return Ok(Value::Number(v));
                }
                v
            }
            None => Number::Int(1),
        };
        if step_value.is_zero() {
            return Err(RuntimeError::new("For-loop step cannot be zero", span));
        }

        let ascending = step_value.as_f64() > 0.0;
        let mut current = start_value;
        let mut iterated = false;
        let mut last = Value::Null;
        let mut results = Vec::new();

        loop {
            let keep_going = if ascending {
                current.as_f64() < end_value.as_f64()
            } else {
                current.as_f64() > end_value.as_f64()
            };
            if !keep_going {
                break;
            }
            iterated = true;
            // Binds in the current scope, the same one the body runs in, so
            // an assignment like `res = res * i` mutates the enclosing
            // variable instead of a scope private to the loop.
            scope.borrow_mut().set(var_name, Value::Number(current));

            let body_value = self.eval(body, scope)?;
            if self.is_returning {
                return Ok(body_value);
            }
            if self.is_breaking {
                self.is_breaking = false;
                break;
            }
            if self.is_continuing {
                self.is_continuing = false;
            }
            if is_block {
                last = body_value;
            } else {
                results.push(body_value);
            }
            current = current.add(step_value);
        }

        if !iterated {
            // An empty range evaluates to Null, not an empty list.
            return Ok(Value::Null);
        }
        if is_block {
            Ok(last)
        } else {
            Ok(Value::list(results))
        }
    }

    fn eval_while(&mut self, cond: &Expr, body: &Expr, is_block: bool, scope: &ScopeRef) -> EvalResult {
        let mut last = Value::Null;
        let mut results = Vec::new();

        loop {
            let cond_value = self.eval(cond, scope)?;
            if self.pending_control_flow() {
                return Ok(cond_value);
            }
            if !cond_value.is_truthy() {
                break;
            }

            let body_value = self.eval(body, scope)?;
            if self.is_returning {
                return Ok(body_value);
            }
            if self.is_breaking {
                self.is_breaking = false;
                break;
            }
            if self.is_continuing {
                self.is_continuing = false;
            }
            if is_block {
                last = body_value;
            } else {
                results.push(body_value);
            }
        }

        if is_block {
            Ok(last)
        } else {
            Ok(Value::list(results))
        }
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr], span: Span, scope: &ScopeRef) -> EvalResult {
        let callee_value = self.eval(callee, scope)?;
        if self.pending_control_flow() {
            return Ok(callee_value);
        }

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval(arg, scope)?;
            if self.pending_control_flow() {
                return Ok(value);
            }
            arg_values.push(value);
        }

        match callee_value {
            Value::Function(func) => self.call_function(&func, arg_values, span),
            Value::BuiltIn(builtin) => {
                if arg_values.len() != builtin.arity {
                    return Err(RuntimeError::new(
                        format!(
                            "'{}' takes {} argument(s) but {} were given",
                            builtin.name,
                            builtin.arity,
                            arg_values.len()
                        ),
                        span,
                    ));
                }
                (builtin.callback)(self, scope, arg_values, span)
            }
            other => Err(RuntimeError::new(format!("'{}' is not callable", other.type_name()), span)),
        }
    }

    fn call_function(&mut self, func: &Rc<FunctionValue>, args: Vec<Value>, span: Span) -> EvalResult {
        if func.arg_names.len() != args.len() {
            return Err(RuntimeError::new(
                format!(
                    "function takes {} argument(s) but {} were given",
                    func.arg_names.len(),
                    args.len()
                ),
                span,
            ));
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::new("Maximum call depth exceeded", span));
        }

        let call_scope = Scope::child(&func.captured_scope);
        for (name, value) in func.arg_names.iter().zip(args) {
            call_scope.borrow_mut().set(*name, value);
        }

        // A call starts a fresh control-flow context: `return` inside it must
        // not escape past this point, and a stray `break`/`continue` with no
        // enclosing loop must not leak into the caller's loop either.
        let saved_returning = self.is_returning;
        let saved_breaking = self.is_breaking;
        let saved_continuing = self.is_continuing;
        self.is_returning = false;
        self.is_breaking = false;
        self.is_continuing = false;
        self.call_depth += 1;

        let result = self.eval(&func.body, &call_scope);

        self.call_depth -= 1;
        self.is_returning = saved_returning;
        self.is_breaking = saved_breaking;
        self.is_continuing = saved_continuing;

        let frame_name = func
            .name
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "<anonymous>".to_string());
        result.map_err(|e| e.with_frame(Frame { name: frame_name, span }))
    }

    fn eval_to_number(&mut self, expr: &Expr, scope: &ScopeRef) -> Result<Number, RuntimeError> {
        let value = self.eval(expr, scope)?;
        if self.pending_control_flow() {
            // The caller checks `pending_control_flow` itself and discards
            // this placeholder number before using it.
            return Ok(Number::Int(0));
        }
        match value {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::new(
                format!("expected a number, got {}", other.type_name()),
                expr.span(),
            )),
        }
    }
}
