//! Formula evaluator
//!
//! Evaluates formula ASTs to produce values. Cell references are handed back to a
//! [`ReferenceResolver`], which typically evaluates the referenced cell's own
//! formula, so evaluation is recursive across cells. Every step of that recursion
//! is counted against a fixed depth budget, which turns reference cycles into a
//! [`FormulaError::DepthExceeded`] instead of a stack overflow.
//!
//! The budget covers parsing as well. [`evaluate_formula`] only lets the parser
//! nest as deep as the remaining budget allows, and charges
//! [`NESTING_COST`] levels per nesting level it used before evaluating. A
//! left-leaning run of binary operators (`1+2+3+...`) is folded in a loop and
//! costs one level however long it is.

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};
use crate::ops::{apply_binary, apply_unary};
use crate::parser::{parse_formula_bounded, MAX_NESTING};
use cellgrid_core::CellValue;
use log::trace;

/// Depth charged for each level of parenthesis, unary or exponent nesting
pub const NESTING_COST: usize = 2;

/// Source of evaluated results for cell references
pub trait ReferenceResolver {
    /// Evaluated result of the cell named by `reference`
    ///
    /// `depth` is the evaluation depth already spent; an implementation that
    /// evaluates a nested formula must continue from it (see
    /// [`EvaluationContext::with_depth`]).
    fn resolve(&self, reference: &str, depth: usize) -> FormulaResult<CellValue>;
}

/// Context for formula evaluation
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Where references are looked up
    resolver: &'a dyn ReferenceResolver,
    /// Depth spent so far
    depth: usize,
    /// Depth at which evaluation gives up
    max_depth: usize,
}

impl<'a> EvaluationContext<'a> {
    /// Create a context at depth zero
    pub fn new(resolver: &'a dyn ReferenceResolver, max_depth: usize) -> Self {
        Self::with_depth(resolver, 0, max_depth)
    }

    /// Create a context continuing from an already-spent depth
    pub fn with_depth(resolver: &'a dyn ReferenceResolver, depth: usize, max_depth: usize) -> Self {
        Self {
            resolver,
            depth,
            max_depth,
        }
    }

    /// Depth spent so far
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Depth at which evaluation gives up
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Depth still available
    pub fn remaining(&self) -> usize {
        self.max_depth.saturating_sub(self.depth)
    }

    /// Spend `cost` levels at once
    fn charge(&self, cost: usize) -> FormulaResult<Self> {
        let depth = self.depth.saturating_add(cost);
        if depth > self.max_depth {
            return Err(FormulaError::DepthExceeded(self.max_depth));
        }
        Ok(Self { depth, ..*self })
    }

    /// One level deeper, or an error once the budget is exhausted
    fn descend(&self) -> FormulaResult<Self> {
        if self.depth >= self.max_depth {
            return Err(FormulaError::DepthExceeded(self.max_depth));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }
}

/// Parse and evaluate formula text within the context's budget
///
/// This is the entry point for a [`ReferenceResolver`] that meets formula text
/// in a referenced cell. Nesting the remaining budget cannot pay for fails with
/// [`FormulaError::DepthExceeded`].
pub fn evaluate_formula(formula: &str, ctx: &EvaluationContext) -> FormulaResult<CellValue> {
    let allowed = (ctx.remaining() / NESTING_COST).min(MAX_NESTING);
    let parsed = parse_formula_bounded(formula, allowed).map_err(|e| match e {
        FormulaError::TooDeeplyNested(_) if allowed < MAX_NESTING => {
            FormulaError::DepthExceeded(ctx.max_depth)
        }
        e => e,
    })?;

    let ctx = ctx.charge(parsed.nesting * NESTING_COST)?;
    evaluate(&parsed.expr, &ctx)
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<CellValue> {
    let ctx = ctx.descend()?;

    match expr {
        FormulaExpr::Number(n) => Ok((*n).into()),

        FormulaExpr::Reference(reference) => {
            trace!("resolving {} at depth {}", reference, ctx.depth);
            ctx.resolver.resolve(&reference.text, ctx.depth)
        }

        FormulaExpr::BinaryOp { .. } => evaluate_chain(expr, &ctx),

        FormulaExpr::UnaryOp { op, operand } => {
            let operand = evaluate(operand, &ctx)?;
            apply_unary(*op, &operand)
        }
    }
}

/// Fold a left-leaning run of binary operators from the left
///
/// Operands are still evaluated left to right; only the spine is walked in a loop.
fn evaluate_chain(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<CellValue> {
    let mut pending: Vec<(BinaryOperator, &FormulaExpr)> = Vec::new();
    let mut leftmost = expr;
    while let FormulaExpr::BinaryOp { op, left, right } = leftmost {
        pending.push((*op, &**right));
        leftmost = &**left;
    }

    let mut acc = evaluate(leftmost, ctx)?;
    for (op, right) in pending.into_iter().rev() {
        let right = evaluate(right, ctx)?;
        acc = apply_binary(op, &acc, &right)?;
    }
    Ok(acc)
}
