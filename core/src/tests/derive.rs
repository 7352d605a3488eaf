use super::*;
use crate::derive::{achievement_for, derive, rarity_for, MAX_HIT_POINTS, MAX_MOVE_DAMAGE};

#[test]
fn test_reference_card() {
    let card = derive(&scores(0.85, 0.7, 0.9, 0.84));

    assert_eq!(card.rarity, RarityTier::Epic);
    assert_eq!(card.hit_points, 84);
    let damage: Vec<u32> = card.moves.iter().map(|m| m.damage).collect();
    assert_eq!(damage, vec![42, 35, 45]);
    assert_eq!(card.achievement, "🌟 Creative Genius");
}

#[test]
fn test_move_order_is_fixed() {
    let card = derive(&scores(0.25, 0.5, 0.75, 0.5));
    let names: Vec<&str> = card.moves.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Creative Strike", "Prompt Blast", "Artistic Wave"]);
    assert_eq!(card.moves[0].damage, 12);
    assert_eq!(card.moves[1].damage, 25);
    assert_eq!(card.moves[2].damage, 37);
}

#[test]
fn test_rarity_thresholds() {
    assert_eq!(rarity_for(1.0), RarityTier::Legendary);
    assert_eq!(rarity_for(0.9), RarityTier::Legendary);
    assert_eq!(rarity_for(0.8999), RarityTier::Epic);
    assert_eq!(rarity_for(0.8), RarityTier::Epic);
    assert_eq!(rarity_for(0.7999), RarityTier::Rare);
    assert_eq!(rarity_for(0.7), RarityTier::Rare);
    assert_eq!(rarity_for(0.6999), RarityTier::Uncommon);
    assert_eq!(rarity_for(0.6), RarityTier::Uncommon);
    assert_eq!(rarity_for(0.5999), RarityTier::Common);
    assert_eq!(rarity_for(0.0), RarityTier::Common);
}

#[test]
fn test_ten_point_boundaries() {
    let at_nine = ScoreSet::from_ten_point(5.0, 5.0, 5.0, 9.0).unwrap();
    assert_eq!(derive(&at_nine).rarity, RarityTier::Legendary);

    let below_nine = ScoreSet::from_ten_point(5.0, 5.0, 5.0, 8.999).unwrap();
    assert_eq!(derive(&below_nine).rarity, RarityTier::Epic);

    for (overall, tier) in [
        (8.0, RarityTier::Epic),
        (7.0, RarityTier::Rare),
        (6.0, RarityTier::Uncommon),
        (5.99, RarityTier::Common),
    ] {
        let s = ScoreSet::from_ten_point(5.0, 5.0, 5.0, overall).unwrap();
        assert_eq!(derive(&s).rarity, tier, "overall {overall}");
    }
}

#[test]
fn test_decimal_scores_floor_exactly() {
    let s = ScoreSet::from_ten_point(5.8, 5.8, 5.8, 5.8).unwrap();
    let card = derive(&s);
    assert_eq!(card.hit_points, 58);
    assert!(card.moves.iter().all(|m| m.damage == 29));

    for (overall, hp) in [(0.29, 29), (0.57, 57), (0.58, 58), (0.999, 99)] {
        let card = derive(&scores(0.5, 0.5, 0.5, overall));
        assert_eq!(card.hit_points, hp, "overall {overall}");
    }
}

#[test]
fn test_legendary_range() {
    for step in 0..=100 {
        let overall = 0.9 + 0.1 * f64::from(step) / 100.0;
        let card = derive(&scores(0.5, 0.5, 0.5, overall.min(1.0)));
        assert_eq!(card.rarity, RarityTier::Legendary, "overall {overall}");
    }
}

#[test]
fn test_stats_stay_in_bounds() {
    for step in 0..=1000 {
        let v = f64::from(step) / 1000.0;
        let card = derive(&scores(v, 1.0 - v, v, v));
        assert!(card.hit_points <= MAX_HIT_POINTS);
        for m in &card.moves {
            assert!(m.damage <= MAX_MOVE_DAMAGE, "damage {} at {v}", m.damage);
        }
    }

    let perfect = derive(&scores(1.0, 1.0, 1.0, 1.0));
    assert_eq!(perfect.hit_points, 100);
    assert!(perfect.moves.iter().all(|m| m.damage == 50));

    let zero = derive(&scores(0.0, 0.0, 0.0, 0.0));
    assert_eq!(zero.hit_points, 0);
    assert!(zero.moves.iter().all(|m| m.damage == 0));
    assert_eq!(zero.rarity, RarityTier::Common);
}

#[test]
fn test_out_of_range_scores_are_clamped() {
    let card = derive(&scores(7.5, -3.0, f64::NAN, 42.0));
    assert_eq!(card.hit_points, 100);
    assert_eq!(card.rarity, RarityTier::Legendary);
    assert_eq!(card.moves[0].damage, 50);
    assert_eq!(card.moves[1].damage, 0);
    assert_eq!(card.moves[2].damage, 0);

    let nan_overall = derive(&scores(0.5, 0.5, 0.5, f64::NAN));
    assert_eq!(nan_overall.hit_points, 0);
    assert_eq!(nan_overall.rarity, RarityTier::Common);

    let inf = derive(&scores(f64::INFINITY, f64::NEG_INFINITY, 0.5, 0.5));
    assert_eq!(inf.moves[0].damage, 50);
    assert_eq!(inf.moves[1].damage, 0);
}

#[test]
fn test_derive_is_deterministic() {
    let s = sample_scores();
    let first = derive(&s);
    for _ in 0..10 {
        assert_eq!(derive(&s), first);
    }
    assert!(first.name.starts_with("Drawing #"));
}

#[test]
fn test_name_number_in_range() {
    for step in 0..200 {
        let v = f64::from(step) / 200.0;
        let card = derive(&scores(v, v, 1.0 - v, v));
        let n: u32 = card
            .name
            .strip_prefix("Drawing #")
            .and_then(|n| n.parse().ok())
            .expect("name carries a number");
        assert!(n < 1000);
    }
}

#[test]
fn test_achievement_table_covers_every_tier() {
    let texts: Vec<&str> = RarityTier::ALL.iter().map(|t| achievement_for(*t)).collect();
    assert_eq!(
        texts,
        vec![
            "🖌️ Budding Artist",
            "🎭 Creative Mind",
            "✨ Artistic Prodigy",
            "🌟 Creative Genius",
            "🎨 Master Artist",
        ]
    );
}

#[test]
fn test_new_scores_supersede_card() {
    let before = derive(&scores(0.5, 0.5, 0.5, 0.5));
    let after = derive(&scores(0.5, 0.5, 0.5, 0.95));
    assert_eq!(before.rarity, RarityTier::Common);
    assert_eq!(after.rarity, RarityTier::Legendary);
    assert_ne!(before, after);
}

#[test]
fn test_feedback_replaces_description() {
    let card = sample_card();
    assert_eq!(card.description, crate::derive::DEFAULT_DESCRIPTION);

    let with_feedback = card.clone().with_description("  Bold lines, great colour.  ");
    assert_eq!(with_feedback.description, "Bold lines, great colour.");

    let blank = card.clone().with_description("   ");
    assert_eq!(blank.description, card.description);
}
