//! Integration coverage for the animation-bank asset: a JSON blueprint
//! document of kind `AnimationBank` parsed through the generic blueprint
//! loader, then read as a `bank::AnimationBank` the way a render system
//! would to resolve a `VisualAnimation` component's current source rect.

use skirmish_engine::assets::bank::AnimationBank;
use skirmish_engine::assets::blueprint::{parse_blueprint, BlueprintType};
use skirmish_engine::ecs::components::SrcRect;

const HERO_BANK_JSON: &str = r#"
{
    "type": "AnimationBank",
    "name": "hero_bank",
    "data": {
        "bankId": "hero_bank",
        "spritesheets": [
            {
                "id": "hero",
                "path": "hero.png",
                "frameW": 32,
                "frameH": 32,
                "cols": 8,
                "rows": 4,
                "hotspot": [16.0, 32.0]
            }
        ],
        "sequences": {
            "walk": {
                "spritesheetId": "hero",
                "startFrame": 4,
                "count": 4,
                "frameDuration": 0.1,
                "loop": true
            },
            "die": {
                "spritesheetId": "hero",
                "startFrame": 16,
                "count": 3,
                "frameDuration": 0.15,
                "loop": false
            }
        }
    }
}
"#;

#[test]
fn blueprint_loader_classifies_animation_banks() {
    let blueprint = parse_blueprint(HERO_BANK_JSON).unwrap();
    assert_eq!(blueprint.kind, BlueprintType::AnimationBank);
    assert_eq!(blueprint.name, "hero_bank");
}

#[test]
fn parsed_bank_resolves_walk_frames_from_the_grid() {
    let blueprint = parse_blueprint(HERO_BANK_JSON).unwrap();
    let bank: AnimationBank = serde_json::from_value(blueprint.data).unwrap();

    assert_eq!(bank.frame_src_rect("walk", 0), Some(SrcRect { x: 4 * 32, y: 0, w: 32, h: 32 }));
    // Frame 4 wraps back to the sequence's own frame 0 since it loops with count 4.
    assert_eq!(bank.frame_src_rect("walk", 4), bank.frame_src_rect("walk", 0));
}

#[test]
fn parsed_bank_clamps_a_non_looping_sequence_to_its_last_frame() {
    let blueprint = parse_blueprint(HERO_BANK_JSON).unwrap();
    let bank: AnimationBank = serde_json::from_value(blueprint.data).unwrap();

    let last = bank.frame_src_rect("die", 2).unwrap();
    let far_past_end = bank.frame_src_rect("die", 50).unwrap();
    assert_eq!(last, far_past_end);
}

#[test]
fn unknown_sequence_name_resolves_to_nothing() {
    let blueprint = parse_blueprint(HERO_BANK_JSON).unwrap();
    let bank: AnimationBank = serde_json::from_value(blueprint.data).unwrap();
    assert!(bank.frame_src_rect("run", 0).is_none());
}
