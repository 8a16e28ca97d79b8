//! Text rendering of a displayed set collection.

use std::fmt::Display;

use crate::core::collect::SetCollection;
use crate::core::types::DrawKind;

pub const FAILED_DRAW: &str = "생성 실패 🥲";

/// Prompt shown while nothing of this kind has been generated.
pub fn placeholder(kind: DrawKind) -> &'static str {
    match kind {
        DrawKind::Lotto => "🍀 눌러봐! 로또 번호를 뽑아보세요",
        DrawKind::Pension => "💰 눌러봐! 연금복권 번호를 뽑아보세요",
    }
}

/// One line per block, numbered from 1.
///
/// An empty collection renders the kind's placeholder. When generation
/// stopped early, a failed block follows the produced ones.
pub fn render_collection<D: Display>(
    kind: DrawKind,
    collection: &SetCollection<D>,
) -> Vec<String> {
    let mut lines: Vec<String> = collection
        .draws()
        .iter()
        .enumerate()
        .map(|(i, draw)| format!("{}번째 세트: {draw}", i + 1))
        .collect();

    if collection.is_partial() {
        lines.push(format!(
            "{}번째 세트: {FAILED_DRAW}",
            collection.produced() + 1
        ));
    } else if lines.is_empty() {
        lines.push(placeholder(kind).to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collect::collect_sets;
    use crate::core::types::{DrawError, LottoSet, PensionDraw};

    #[test]
    fn empty_collection_renders_kind_placeholder() {
        let lotto: SetCollection<LottoSet> = SetCollection::empty();
        let pension: SetCollection<PensionDraw> = SetCollection::empty();
        assert_eq!(
            render_collection(DrawKind::Lotto, &lotto),
            vec![placeholder(DrawKind::Lotto)]
        );
        assert_eq!(
            render_collection(DrawKind::Pension, &pension),
            vec![placeholder(DrawKind::Pension)]
        );
        assert_ne!(placeholder(DrawKind::Lotto), placeholder(DrawKind::Pension));
    }

    #[test]
    fn blocks_are_numbered_from_one() {
        let mut serials = [1u32, 2].into_iter();
        let collection = collect_sets(2, || {
            PensionDraw::new(3, serials.next().ok_or(DrawError::Empty)?)
        });
        assert_eq!(
            render_collection(DrawKind::Pension, &collection),
            vec!["1번째 세트: 3조 000001", "2번째 세트: 3조 000002"]
        );
    }

    #[test]
    fn failed_generation_renders_failed_block() {
        let collection: SetCollection<LottoSet> = collect_sets(3, || Err(DrawError::Empty));
        assert_eq!(
            render_collection(DrawKind::Lotto, &collection),
            vec![format!("1번째 세트: {FAILED_DRAW}")]
        );
    }
}
