//! Layered layout for the skill graph.
//!
//! Pure function of the skill set: depth from the requirement graph picks
//! the layer, category ordering picks the column. Coordinates are display
//! state only and never feed back into business rules.

use std::collections::BTreeMap;

use crate::core::Skill;

use super::traversal::{adjacency_of, dependency_depths};

/// Vertical distance between dependency layers.
pub const LAYER_SPACING: f64 = 250.0;

/// Horizontal distance between skills within a layer.
pub const COLUMN_SPACING: f64 = 350.0;

/// Assign display coordinates to every skill: `y` from dependency depth,
/// `x` evenly spaced and centered around 0 within each layer.
///
/// Deterministic: the same skill and edge sets always produce the same
/// coordinates, regardless of input order.
#[must_use]
pub fn assign_positions(skills: &[Skill]) -> Vec<Skill> {
    if skills.is_empty() {
        return Vec::new();
    }

    let adj = adjacency_of(skills);
    let depths = dependency_depths(&adj);

    // BTreeMap keeps layers in depth order; within a layer, sort by
    // (category, id) so ties are stable across runs.
    let mut layers: BTreeMap<usize, Vec<&Skill>> = BTreeMap::new();
    for skill in skills {
        let depth = depths.get(&skill.id).copied().unwrap_or(0);
        layers.entry(depth).or_default().push(skill);
    }

    let mut positioned = Vec::with_capacity(skills.len());
    for (depth, mut layer) in layers {
        layer.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.id.cmp(&b.id)));

        let width = (layer.len() - 1) as f64 * COLUMN_SPACING;
        let start_x = -width / 2.0;
        let y = depth as f64 * LAYER_SPACING;

        for (index, skill) in layer.into_iter().enumerate() {
            positioned.push(skill.at_position(start_x + index as f64 * COLUMN_SPACING, y));
        }
    }

    positioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Level;

    fn skill(id: &str, category: &str, reqs: &[&str]) -> Skill {
        let mut s = Skill::new(id, "tester", id.to_uppercase(), category)
            .with_requirements(reqs.iter().map(|r| (*r).to_string()).collect());
        s.level = Level::Exposure;
        s
    }

    fn position_of<'a>(layout: &'a [Skill], id: &str) -> &'a Skill {
        layout.iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        assert!(assign_positions(&[]).is_empty());
    }

    #[test]
    fn roots_sit_on_layer_zero() {
        let skills = vec![skill("a", "music", &[]), skill("b", "music", &["a"])];
        let layout = assign_positions(&skills);

        assert_eq!(position_of(&layout, "a").y, 0.0);
        assert_eq!(position_of(&layout, "b").y, LAYER_SPACING);
    }

    #[test]
    fn single_skill_in_layer_is_centered() {
        let skills = vec![skill("a", "music", &[])];
        let layout = assign_positions(&skills);
        assert_eq!(position_of(&layout, "a").x, 0.0);
    }

    #[test]
    fn layer_columns_are_centered_and_spaced() {
        let skills = vec![
            skill("a", "art", &[]),
            skill("b", "music", &[]),
            skill("c", "zoology", &[]),
        ];
        let layout = assign_positions(&skills);

        // Sorted by category: art, music, zoology.
        assert_eq!(position_of(&layout, "a").x, -COLUMN_SPACING);
        assert_eq!(position_of(&layout, "b").x, 0.0);
        assert_eq!(position_of(&layout, "c").x, COLUMN_SPACING);
    }

    #[test]
    fn depth_uses_longest_path() {
        let skills = vec![
            skill("root", "x", &[]),
            skill("mid", "x", &["root"]),
            skill("leaf", "x", &["mid", "root"]),
        ];
        let layout = assign_positions(&skills);
        assert_eq!(position_of(&layout, "leaf").y, 2.0 * LAYER_SPACING);
    }

    #[test]
    fn layout_is_deterministic_under_input_reordering() {
        let forward = vec![
            skill("a", "music", &[]),
            skill("b", "music", &["a"]),
            skill("c", "art", &["a"]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let layout_a = assign_positions(&forward);
        let layout_b = assign_positions(&reversed);

        for s in &layout_a {
            let other = position_of(&layout_b, &s.id);
            assert_eq!((s.x, s.y), (other.x, other.y));
        }
    }

    #[test]
    fn category_ties_break_by_id() {
        let skills = vec![skill("beta", "music", &[]), skill("alpha", "music", &[])];
        let layout = assign_positions(&skills);
        assert!(position_of(&layout, "alpha").x < position_of(&layout, "beta").x);
    }
}
