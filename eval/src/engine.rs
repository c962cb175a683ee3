//! Single-pass shunting-yard evaluation.

use shunt_parser::{
    BracketPair, Function, Grammar, OpArity, Operator, Parameters, Spanned, Token, TokenKind,
    Tokenizer,
};

use crate::{
    alloc::{ToOwned, Vec},
    Error, ErrorKind, EvalResult, Evaluator, Malformed, Operands, Variables,
};

/// What the engine expects to see next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// An operand: a value, an open bracket or a unary operator.
    Operand,
    /// A binary operator, a close bracket or a separator.
    Operator,
}

struct PendingCall<'a, 'p, F> {
    function: &'p Function<F>,
    name: Spanned<'a>,
    arg_count: usize,
}

enum StackItem<'a, 'p, G: Grammar> {
    Operator {
        operator: &'p Operator<G::Op>,
        span: Spanned<'a>,
    },
    Bracket {
        pair: &'p BracketPair,
        span: Spanned<'a>,
        call: Option<PendingCall<'a, 'p, G::Func>>,
    },
}

fn unmatched_bracket(symbol: &str) -> ErrorKind {
    ErrorKind::UnmatchedBracket {
        symbol: symbol.to_owned(),
    }
}

/// Evaluation state for a single expression: the operator / bracket stack and the value stack.
pub(crate) struct Engine<'a, 'e, E: Evaluator + ?Sized> {
    evaluator: &'e E,
    params: &'e Parameters<E::Grammar>,
    vars: &'e dyn Variables<E::Value>,
    stack: Vec<StackItem<'a, 'e, E::Grammar>>,
    values: Vec<E::Value>,
    position: Position,
}

impl<'a, 'e, E: Evaluator + ?Sized> Engine<'a, 'e, E> {
    pub fn new(evaluator: &'e E, vars: &'e dyn Variables<E::Value>) -> Self {
        Self {
            evaluator,
            params: evaluator.parameters(),
            vars,
            stack: Vec::new(),
            values: Vec::new(),
            position: Position::Operand,
        }
    }

    pub fn evaluate(mut self, expr: &'a str) -> EvalResult<'a, E::Value> {
        log::trace!("Evaluating `{}`", expr);

        let mut tokens = Tokenizer::new(expr, self.params);
        let mut is_empty = true;
        while let Some(token) = tokens.next() {
            let token = token?;
            is_empty = false;

            match &token.extra {
                TokenKind::Literal(literal) => {
                    self.expect_operand(&token)?;
                    let value = self
                        .evaluator
                        .literal_to_value(literal, self.vars)
                        .map_err(|kind| Error::new(kind, &token))?;
                    self.push_value(value);
                }
                TokenKind::Identifier => {
                    self.expect_operand(&token)?;
                    let value = self.resolve_identifier(&token)?;
                    self.push_value(value);
                }
                TokenKind::Function => {
                    self.expect_operand(&token)?;
                    let open = tokens.next().transpose()?;
                    self.open_call(&token, open, expr)?;
                }
                TokenKind::OpenBracket => {
                    self.expect_operand(&token)?;
                    let params = self.params;
                    let pair = params
                        .expression_bracket(token.fragment())
                        .ok_or_else(|| Error::new(unmatched_bracket(token.fragment()), &token))?;
                    self.stack.push(StackItem::Bracket {
                        pair,
                        span: token.with_no_extra(),
                        call: None,
                    });
                }
                TokenKind::Operator => self.push_operator(&token)?,
                TokenKind::Separator => self.separate_args(&token)?,
                TokenKind::CloseBracket => self.close_bracket(&token)?,
                _ => {
                    let kind = ErrorKind::MalformedExpression(Malformed::ValueAfterValue);
                    return Err(Error::new(kind, &token));
                }
            }
        }

        self.finish(expr, is_empty)
    }

    fn expect_operand<T>(&self, token: &Spanned<'a, T>) -> Result<(), Error<'a>> {
        match self.position {
            Position::Operand => Ok(()),
            Position::Operator => {
                let kind = ErrorKind::MalformedExpression(Malformed::ValueAfterValue);
                Err(Error::new(kind, token))
            }
        }
    }

    fn push_value(&mut self, value: E::Value) {
        self.values.push(value);
        self.position = Position::Operator;
    }

    fn resolve_identifier(&self, token: &Token<'a>) -> Result<E::Value, Error<'a>> {
        let name = *token.fragment();
        if let Some(constant) = self.params.constant(name) {
            return self
                .evaluator
                .evaluate_constant(constant, self.vars)
                .map_err(|kind| Error::new(kind, token));
        }

        self.evaluator
            .resolve_variable(name, self.vars)
            .or_else(|| self.evaluator.unresolved_identifier(name, self.vars))
            .ok_or_else(|| Error::new(ErrorKind::unknown_variable(name), token))
    }

    fn open_call(
        &mut self,
        name: &Token<'a>,
        open: Option<Token<'a>>,
        expr: &'a str,
    ) -> Result<(), Error<'a>> {
        let params = self.params;
        let function = params.function(name.fragment()).ok_or_else(|| {
            let kind = ErrorKind::UnknownFunction {
                name: (*name.fragment()).to_owned(),
            };
            Error::new(kind, name)
        })?;

        let open = open.ok_or_else(|| {
            let kind = ErrorKind::MalformedExpression(Malformed::MissingArgument);
            Error::new(kind, &Spanned::end_of(expr))
        })?;
        let pair = if open.extra == TokenKind::OpenBracket {
            params.function_bracket(open.fragment())
        } else {
            None
        };
        let pair = pair.ok_or_else(|| Error::new(unmatched_bracket(open.fragment()), &open))?;

        self.stack.push(StackItem::Bracket {
            pair,
            span: open.with_no_extra(),
            call: Some(PendingCall {
                function,
                name: name.with_no_extra(),
                arg_count: 1,
            }),
        });
        Ok(())
    }

    fn push_operator(&mut self, token: &Token<'a>) -> Result<(), Error<'a>> {
        let arity = match self.position {
            Position::Operand => OpArity::Unary,
            Position::Operator => OpArity::Binary,
        };
        let params = self.params;
        let operator = params.operator(token.fragment(), arity).ok_or_else(|| {
            let kind = ErrorKind::UnknownOperator {
                symbol: (*token.fragment()).to_owned(),
                arity,
            };
            Error::new(kind, token)
        })?;

        // Prefix operators have no left operand, so there is nothing to reduce.
        if arity == OpArity::Binary {
            self.reduce_operators(|top| top.binds_before(operator))?;
        }
        self.stack.push(StackItem::Operator {
            operator,
            span: token.with_no_extra(),
        });
        self.position = Position::Operand;
        Ok(())
    }

    /// Applies operators from the top of the stack while `should_reduce` holds for them,
    /// stopping at the first bracket.
    fn reduce_operators(
        &mut self,
        should_reduce: impl Fn(&Operator<<E::Grammar as Grammar>::Op>) -> bool,
    ) -> Result<(), Error<'a>> {
        loop {
            let reduce = matches!(
                self.stack.last(),
                Some(StackItem::Operator { operator, .. }) if should_reduce(*operator)
            );
            if !reduce {
                return Ok(());
            }
            if let Some(StackItem::Operator { operator, span }) = self.stack.pop() {
                self.apply_operator(operator, &span)?;
            }
        }
    }

    fn apply_operator(
        &mut self,
        operator: &Operator<<E::Grammar as Grammar>::Op>,
        span: &Spanned<'a>,
    ) -> Result<(), Error<'a>> {
        let operands = match operator.arity() {
            OpArity::Unary => self.values.pop().map(Operands::Unary),
            OpArity::Binary => {
                let rhs = self.values.pop();
                let lhs = self.values.pop();
                lhs.zip(rhs).map(|(lhs, rhs)| Operands::Binary(lhs, rhs))
            }
        };
        let operands = operands.ok_or_else(|| {
            let kind = ErrorKind::MalformedExpression(Malformed::MissingOperand);
            Error::new(kind, span)
        })?;

        log::trace!(
            "Applying {} at {}:{}",
            operator,
            span.location_line(),
            span.get_column()
        );
        let value = self
            .evaluator
            .evaluate_operator(operator, operands, self.vars)
            .map_err(|kind| Error::new(kind, span))?;
        self.values.push(value);
        Ok(())
    }

    /// Checks the token preceding a separator or a close bracket when an operand
    /// is expected instead.
    fn missing_operand(&self, token: &Token<'a>) -> Error<'a> {
        let malformed = match self.stack.last() {
            Some(StackItem::Bracket { call: Some(_), .. }) => Malformed::MissingArgument,
            Some(StackItem::Bracket { call: None, .. }) => Malformed::EmptyGroup,
            Some(StackItem::Operator { .. }) | None => Malformed::MissingOperand,
        };
        Error::new(ErrorKind::MalformedExpression(malformed), token)
    }

    fn separate_args(&mut self, token: &Token<'a>) -> Result<(), Error<'a>> {
        let in_call = self.stack.iter().rev().find_map(|item| match item {
            StackItem::Bracket { call, .. } => Some(call.is_some()),
            StackItem::Operator { .. } => None,
        });
        if in_call != Some(true) {
            return Err(Error::new(ErrorKind::UnexpectedSeparator, token));
        }
        if self.position == Position::Operand {
            return Err(self.missing_operand(token));
        }

        self.reduce_operators(|_| true)?;
        if let Some(StackItem::Bracket {
            call: Some(call), ..
        }) = self.stack.last_mut()
        {
            call.arg_count += 1;
        }
        self.position = Position::Operand;
        Ok(())
    }

    fn close_bracket(&mut self, token: &Token<'a>) -> Result<(), Error<'a>> {
        let symbol = *token.fragment();
        if self.position == Position::Operand {
            let is_call_without_args = matches!(
                self.stack.last(),
                Some(StackItem::Bracket { call: Some(call), .. }) if call.arg_count == 1
            );
            if is_call_without_args {
                if let Some(StackItem::Bracket {
                    call: Some(call), ..
                }) = self.stack.last_mut()
                {
                    call.arg_count = 0;
                }
            } else if self.stack.is_empty() {
                return Err(Error::new(unmatched_bracket(symbol), token));
            } else {
                return Err(self.missing_operand(token));
            }
        }

        self.reduce_operators(|_| true)?;
        let (pair, call) = match self.stack.pop() {
            Some(StackItem::Bracket { pair, call, .. }) => (pair, call),
            _ => return Err(Error::new(unmatched_bracket(symbol), token)),
        };
        if pair.close() != symbol {
            return Err(Error::new(unmatched_bracket(symbol), token));
        }

        if let Some(call) = call {
            self.call_function(call)?;
        }
        self.position = Position::Operator;
        Ok(())
    }

    fn call_function(
        &mut self,
        call: PendingCall<'a, 'e, <E::Grammar as Grammar>::Func>,
    ) -> Result<(), Error<'a>> {
        let PendingCall {
            function,
            name,
            arg_count,
        } = call;
        let arity = function.arity();
        if !arity.accepts(arg_count) {
            let kind = ErrorKind::ArityMismatch {
                name: function.name().to_owned(),
                expected: arity,
                actual: arg_count,
            };
            return Err(Error::new(kind, &name));
        }

        let args_start = self.values.len().checked_sub(arg_count).ok_or_else(|| {
            let kind = ErrorKind::MalformedExpression(Malformed::MissingArgument);
            Error::new(kind, &name)
        })?;
        let args = self.values.split_off(args_start);

        log::trace!(
            "Calling `{}` with {} arg(s) at {}:{}",
            function.name(),
            arg_count,
            name.location_line(),
            name.get_column()
        );
        let value = self
            .evaluator
            .evaluate_function(function, args, self.vars)
            .map_err(|kind| Error::new(kind, &name))?;
        self.values.push(value);
        Ok(())
    }

    fn finish(mut self, expr: &'a str, is_empty: bool) -> EvalResult<'a, E::Value> {
        let end = Spanned::end_of(expr);
        if is_empty {
            let kind = ErrorKind::MalformedExpression(Malformed::Empty);
            return Err(Error::new(kind, &end));
        }
        if self.position == Position::Operand {
            return Err(match self.stack.last() {
                Some(StackItem::Bracket { pair, span, .. }) => {
                    Error::new(unmatched_bracket(pair.open()), span)
                }
                _ => Error::new(ErrorKind::MalformedExpression(Malformed::MissingOperand), &end),
            });
        }

        self.reduce_operators(|_| true)?;
        if let Some(StackItem::Bracket { pair, span, .. }) = self.stack.last() {
            return Err(Error::new(unmatched_bracket(pair.open()), span));
        }

        match (self.values.pop(), self.values.is_empty()) {
            (Some(value), true) => Ok(value),
            _ => {
                let kind = ErrorKind::MalformedExpression(Malformed::LeftoverValues);
                Err(Error::new(kind, &end))
            }
        }
    }
}
