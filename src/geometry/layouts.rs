//! Figures for each problem kind
//!
//! All figures are built bottom to top and left to right. Every cell of a
//! figure has the same width, derived from the parameters where possible so
//! that hidden values do not leak through their size.

use crate::numeric::digit_count;
use crate::problem::{BasicOperation, MysteryOperation, ProblemInstance, ProblemParameters, Sequence, Token};

use super::composer::{Composer, CELL_HEIGHT};
use super::config::SizingContext;
use super::error::LayoutError;
use super::types::{CoordinateId, Layout, Offset, Primitive};

/// Room left of a column for the operator glyph, in character widths
const OPERATOR_SPACE: f64 = 2.0;
/// Vertical space between stacked rows, in line heights
const ROW_GAP: f64 = 0.25;
/// Horizontal space between cells of a row, in character widths
const CELL_GAP: f64 = 1.0;
/// Horizontal space between digit cells of a mystery operation
const DIGIT_GAP: f64 = 0.5;

/// Width of a cell showing up to `digits` characters
fn cell_width(digits: usize) -> f64 {
    2.0 + digits as f64
}

/// Lay out `instance`, generated from `params`, as a figure
pub fn compose(
    params: &ProblemParameters,
    instance: &ProblemInstance,
    sizing: &SizingContext,
) -> Result<Layout, LayoutError> {
    sizing.validate()?;
    let kind = params.kind();
    if instance.kind() != kind {
        return Err(LayoutError::shape(
            instance.kind(),
            format!("parameters are for {kind}"),
        ));
    }
    let expected = expected_tokens(params);
    if instance.args().len() != expected {
        return Err(LayoutError::shape(
            kind,
            format!("expected {expected} tokens, found {}", instance.args().len()),
        ));
    }

    let mut composer = Composer::new();
    let args = instance.args();
    match params {
        ProblemParameters::BasicOperation(p) => basic_operation(&mut composer, p, args)?,
        ProblemParameters::Division(_) => division(&mut composer, instance)?,
        ProblemParameters::Sequence(p) => sequence(&mut composer, p, args)?,
        ProblemParameters::MultiplicationTable(_) => multiplication_table(&mut composer, instance)?,
        ProblemParameters::MysteryOperation(p) => mystery_operation(&mut composer, p, args)?,
    }
    composer.finish(sizing.margin_x, sizing.margin_y)
}

fn expected_tokens(params: &ProblemParameters) -> usize {
    match params {
        ProblemParameters::BasicOperation(p) => p.operands as usize + 1,
        ProblemParameters::Division(_) => 4,
        ProblemParameters::Sequence(p) => p.items as usize,
        ProblemParameters::MultiplicationTable(p) => 1 + 3 * p.rows(),
        ProblemParameters::MysteryOperation(p) => p.token_count(),
    }
}

/// Widest solution token among `range`
fn widest(instance: &ProblemInstance, range: std::ops::Range<usize>) -> usize {
    instance.solution()[range]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(1)
}

/// Operator glyph vertically centered on a cell, left of it
fn operator_label(
    composer: &mut Composer,
    cell: CoordinateId,
    cell_name: &str,
    glyph: &str,
) -> Result<(), LayoutError> {
    let upper_right = composer.lookup(&format!("{cell_name}.ur"))?;
    let center = composer.between(format!("{cell_name}.center"), cell, upper_right, Offset::zero())?;
    let origin = composer.origin();
    let at = composer.aligned("operator", origin, center, Offset::new(OPERATOR_SPACE / 4.0, 0.0))?;
    composer.add(Primitive::Label {
        at,
        text: glyph.to_string(),
    })
}

/// Horizontal rule from `left` spanning `length` widths
fn rule(composer: &mut Composer, name: &str, left: CoordinateId, length: f64) -> Result<(), LayoutError> {
    let right = composer.relative(format!("{name}.right"), left, Offset::new(length, 0.0))?;
    composer.polyline(vec![left, right])
}

/// Column arithmetic: operands stacked over a rule, result below it
fn basic_operation(composer: &mut Composer, params: &BasicOperation, args: &[Token]) -> Result<(), LayoutError> {
    let k = params.operands as usize;
    let width = cell_width(params.operand_digits.max(params.result_digits) as usize);
    let origin = composer.origin();

    let result = composer.cell("result", origin, Offset::new(OPERATOR_SPACE, 0.0), width, k, &args[k])?;
    let rule_left = composer.relative("rule", result, Offset::new(-OPERATOR_SPACE, CELL_HEIGHT + ROW_GAP))?;
    rule(composer, "rule", rule_left, OPERATOR_SPACE + width)?;

    let mut below = result;
    for index in (0..k).rev() {
        let name = format!("operand.{index}");
        let rise = if index + 1 == k { 2.0 * ROW_GAP } else { ROW_GAP };
        below = composer.cell(
            name.clone(),
            below,
            Offset::new(0.0, CELL_HEIGHT + rise),
            width,
            index,
            &args[index],
        )?;
        if index + 1 == k {
            operator_label(composer, below, &name, params.operator.glyph())?;
        }
    }
    Ok(())
}

/// Bracket layout: dividend and remainder on the left, divisor and quotient
/// on the right of the bracket
fn division(composer: &mut Composer, instance: &ProblemInstance) -> Result<(), LayoutError> {
    let args = instance.args();
    let width = cell_width(widest(instance, 0..4));
    let origin = composer.origin();

    let remainder = composer.cell("remainder", origin, Offset::zero(), width, 3, &args[3])?;
    let quotient = composer.cell(
        "quotient",
        remainder,
        Offset::new(width + CELL_GAP, ROW_GAP),
        width,
        2,
        &args[2],
    )?;
    let dividend = composer.cell(
        "dividend",
        remainder,
        Offset::new(0.0, CELL_HEIGHT + 2.0 * ROW_GAP),
        width,
        0,
        &args[0],
    )?;
    let anchor = composer.aligned("divisor.anchor", quotient, dividend, Offset::zero())?;
    composer.cell("divisor", anchor, Offset::zero(), width, 1, &args[1])?;

    let bottom = composer.relative("bracket.bottom", remainder, Offset::new(width + CELL_GAP / 2.0, 0.0))?;
    let top = composer.relative("bracket.top", bottom, Offset::new(0.0, 2.0 * CELL_HEIGHT + 3.0 * ROW_GAP))?;
    composer.polyline(vec![top, bottom])?;
    let joint = composer.between("bracket.joint", bottom, top, Offset::zero())?;
    rule(composer, "bracket", joint, width + CELL_GAP)
}

/// A single row of cells
fn sequence(composer: &mut Composer, params: &Sequence, args: &[Token]) -> Result<(), LayoutError> {
    let digits = digit_count(params.geq).max(digit_count(params.leq));
    let width = cell_width(digits as usize);
    let origin = composer.origin();
    composer.row("item", origin, Offset::zero(), width, CELL_GAP, args.iter().enumerate())?;
    Ok(())
}

/// One row `a × b = p` per entry, first entry on top
fn multiplication_table(composer: &mut Composer, instance: &ProblemInstance) -> Result<(), LayoutError> {
    let args = instance.args();
    let rows = (args.len() - 1) / 3;
    let width = cell_width(widest(instance, 1..args.len()));
    let step = Offset::new(width + 2.0 * CELL_GAP, 0.0);
    let mut anchor = composer.origin();

    for row in (0..rows).rev() {
        let base = 1 + 3 * row;
        let offset = if row + 1 == rows {
            Offset::zero()
        } else {
            Offset::new(0.0, CELL_HEIGHT + 2.0 * ROW_GAP)
        };
        let a = composer.cell(format!("row.{row}.a"), anchor, offset, width, base, &args[base])?;
        let glyph_offset = Offset::new(width + CELL_GAP / 2.0, CELL_HEIGHT / 2.0);
        composer.label(format!("row.{row}.times"), a, glyph_offset, "\u{00d7}")?;
        let b = composer.cell(format!("row.{row}.b"), a, step, width, base + 1, &args[base + 1])?;
        composer.label(format!("row.{row}.equals"), b, glyph_offset, "=")?;
        composer.cell(format!("row.{row}.p"), b, step, width, base + 2, &args[base + 2])?;
        anchor = a;
    }
    Ok(())
}

/// Column arithmetic with one cell per digit, right-aligned
fn mystery_operation(composer: &mut Composer, params: &MysteryOperation, args: &[Token]) -> Result<(), LayoutError> {
    use crate::problem::mystery::HEADER_LEN;

    let d1 = params.digits1 as usize;
    let d2 = params.digits2 as usize;
    let r = params.answer_digits as usize;
    let columns = d1.max(d2).max(r);
    let width = cell_width(1);
    let pitch = width + DIGIT_GAP;
    let origin = composer.origin();

    let fields = [
        ("answer", HEADER_LEN + d1 + d2, r, 0.0),
        ("second", HEADER_LEN + d1, d2, CELL_HEIGHT + 2.0 * ROW_GAP),
        ("first", HEADER_LEN, d1, 2.0 * CELL_HEIGHT + 3.0 * ROW_GAP),
    ];
    for (name, start, len, height) in fields {
        let offset = Offset::new(OPERATOR_SPACE + (columns - len) as f64 * pitch, height);
        let tokens = args.iter().enumerate().skip(start).take(len);
        let cells = composer.row(name, origin, offset, width, DIGIT_GAP, tokens)?;

        if name == "answer" {
            let left = composer.relative("rule", origin, Offset::new(0.0, CELL_HEIGHT + ROW_GAP))?;
            rule(composer, "rule", left, OPERATOR_SPACE + columns as f64 * pitch - DIGIT_GAP)?;
        }
        if name == "second" {
            if let Some(first_cell) = cells.first() {
                operator_label(composer, *first_cell, "second.0", params.operator.glyph())?;
            }
        }
    }
    Ok(())
}
