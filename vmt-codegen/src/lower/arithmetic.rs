//! Stack arithmetic, logic and comparisons
//! 
//! Binary operators pop `b` (former top) and `a`, and leave `a OP b` in a's
//! slot. Unary operators rewrite the top slot in place. Comparisons have no
//! ALU primitive, so they branch to one of two fresh labels that store the
//! canonical boolean (-1 true, 0 false).

use crate::asm::{Comp, Dest, Jump, Reg};
use crate::builder::InstBuilder;
use crate::lower::TranslatorState;
use vmt_common::ArithmeticOp;

/// Labels of one comparison occurrence, all derived from a single counter id
struct CmpLabels {
    truthy: String,
    falsy: String,
    end: String,
    subtract: String,
    a_negative: String,
}

impl CmpLabels {
    fn new(id: u32) -> Self {
        Self {
            truthy: format!("CMP_TRUE.{}", id),
            falsy: format!("CMP_FALSE.{}", id),
            end: format!("CMP_END.{}", id),
            subtract: format!("CMP_SUB.{}", id),
            a_negative: format!("CMP_ANEG.{}", id),
        }
    }
}

pub fn lower_arithmetic(b: &mut InstBuilder, state: &mut TranslatorState, op: ArithmeticOp) {
    match op {
        ArithmeticOp::Add => lower_binary(b, Comp::DPlusM),
        ArithmeticOp::Sub => lower_binary(b, Comp::MMinusD),
        ArithmeticOp::And => lower_binary(b, Comp::DAndM),
        ArithmeticOp::Or => lower_binary(b, Comp::DOrM),
        ArithmeticOp::Neg => lower_unary(b, Comp::NegM),
        ArithmeticOp::Not => lower_unary(b, Comp::NotM),
        ArithmeticOp::Eq => lower_eq(b, state),
        ArithmeticOp::Gt => lower_ordered(b, state, Jump::Jgt),
        ArithmeticOp::Lt => lower_ordered(b, state, Jump::Jlt),
    }
}

/// D = b; A -> a; a = comp(D, M)
fn lower_binary(b: &mut InstBuilder, comp: Comp) {
    b.pop_d().assign(Dest::A, Comp::AMinusOne).assign(Dest::M, comp);
}

fn lower_unary(b: &mut InstBuilder, comp: Comp) {
    b.at(Reg::SP).assign(Dest::A, Comp::MMinusOne).assign(Dest::M, comp);
}

/// a - b is zero exactly when a == b, even when the subtraction wraps
fn lower_eq(b: &mut InstBuilder, state: &mut TranslatorState) {
    let labels = CmpLabels::new(state.next_label_id());
    b.pop_d()
        .at(Reg::SP)
        .assign(Dest::AM, Comp::MMinusOne)
        .assign(Dest::D, Comp::MMinusD)
        .at(labels.truthy.as_str())
        .jump(Comp::D, Jump::Jeq);
    write_boolean(b, &labels);
}

/// `gt` / `lt` for signed 16-bit operands.
///
/// The sign of `a - b` is only trustworthy when a and b share a sign; with
/// mixed signs the answer follows from the sign of `a` alone.
fn lower_ordered(b: &mut InstBuilder, state: &mut TranslatorState, jump: Jump) {
    let labels = CmpLabels::new(state.next_label_id());
    let (a_nonneg_b_neg, a_neg_b_nonneg) = if jump == Jump::Jgt {
        (&labels.truthy, &labels.falsy)
    } else {
        (&labels.falsy, &labels.truthy)
    };

    // R13 = b; D = a, SP -> a's slot
    b.pop_d()
        .at(Reg::R13)
        .assign(Dest::M, Comp::D)
        .at(Reg::SP)
        .assign(Dest::AM, Comp::MMinusOne)
        .assign(Dest::D, Comp::M)
        .at(labels.a_negative.as_str())
        .jump(Comp::D, Jump::Jlt);

    // a >= 0
    b.at(Reg::R13)
        .assign(Dest::D, Comp::M)
        .at(labels.subtract.as_str())
        .jump(Comp::D, Jump::Jge)
        .goto(a_nonneg_b_neg.as_str());

    // a < 0
    b.label(labels.a_negative.as_str())
        .at(Reg::R13)
        .assign(Dest::D, Comp::M)
        .at(labels.subtract.as_str())
        .jump(Comp::D, Jump::Jlt)
        .goto(a_neg_b_nonneg.as_str());

    // same sign: D = a - b cannot overflow
    b.label(labels.subtract.as_str())
        .at(Reg::R13)
        .assign(Dest::D, Comp::M)
        .at(Reg::SP)
        .assign(Dest::A, Comp::M)
        .assign(Dest::D, Comp::MMinusD)
        .at(labels.truthy.as_str())
        .jump(Comp::D, jump);

    write_boolean(b, &labels);
}

/// Shared tail: falls into false, jumps land on true, both meet at end
fn write_boolean(b: &mut InstBuilder, labels: &CmpLabels) {
    b.label(labels.falsy.as_str())
        .store_top(Comp::Zero)
        .goto(labels.end.as_str())
        .label(labels.truthy.as_str())
        .store_top(Comp::NegOne)
        .label(labels.end.as_str())
        .at(Reg::SP)
        .assign(Dest::M, Comp::MPlusOne);
}
