use charsheet_engine::{Catalog, Character, Rules, RulesError};

fn d20_seq(seq: &[i32]) -> impl FnMut() -> i32 {
    let mut i = 0usize;
    let values = seq.to_vec();
    move || {
        let result = values[i % values.len()];
        i += 1;
        result
    }
}

fn rogue(rules: &Rules<'_>, name: &str, dex: i32, stealth: u32) -> Character {
    let mut c = rules.create_character(name);
    c.attributes["Dexterity"] = dex;
    rules.set_skill_points(&mut c, "Stealth", stealth).unwrap();
    c
}

#[test]
fn stealth_total_uses_dexterity_modifier() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let c = rogue(&rules, "Aria", 16, 2);
    assert_eq!(rules.skill_total(&c, "Stealth").unwrap(), 5);

    let res = rules.resolve_skill_check(&c, "Stealth", 18, || 15).unwrap();
    assert_eq!(res.roll, 15);
    assert_eq!(res.skill_total, 5);
    assert_eq!(res.total, 20);
    assert!(res.success);
}

#[test]
fn low_roll_fails() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let c = rogue(&rules, "Aria", 16, 2);
    let res = rules.resolve_skill_check(&c, "stealth", 18, || 12).unwrap();
    assert_eq!(res.skill, "Stealth");
    assert_eq!(res.total, 17);
    assert!(!res.success);
}

#[test]
fn unknown_skill_fails_fast() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let c = rules.create_character("Aria");
    assert!(matches!(
        rules.resolve_skill_check(&c, "Juggling", 10, || 10),
        Err(RulesError::UnknownSkill(_))
    ));
}

#[test]
fn party_tie_goes_to_first_character() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    // Both at 4 points + DEX 16 (+3) = 7
    let party = vec![rogue(&rules, "First", 16, 4), rogue(&rules, "Second", 16, 4)];
    for _ in 0..5 {
        let res = rules
            .resolve_party_skill_check(&party, "Stealth", 15, || 8)
            .unwrap();
        assert_eq!(res.character_name, "First");
        assert_eq!(res.character_id, party[0].id);
        assert_eq!(res.skill_total, 7);
        assert_eq!(res.total, 15);
        assert!(res.success);
    }
}

#[test]
fn party_picks_strictly_greatest_total() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let party = vec![
        rogue(&rules, "Clumsy", 8, 0),
        rogue(&rules, "Sneaky", 18, 3),
        rogue(&rules, "Average", 12, 1),
    ];
    let res = rules
        .resolve_party_skill_check(&party, "Stealth", 30, d20_seq(&[20]))
        .unwrap();
    assert_eq!(res.character_name, "Sneaky");
    assert_eq!(res.total, 27);
    assert!(!res.success);
}

#[test]
fn party_with_only_negative_totals_reports_true_best() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let party = vec![rogue(&rules, "Worst", 4, 0), rogue(&rules, "LessBad", 8, 0)];
    let res = rules
        .resolve_party_skill_check(&party, "Stealth", 10, || 10)
        .unwrap();
    assert_eq!(res.character_name, "LessBad");
    assert_eq!(res.skill_total, -1);
    assert_eq!(res.total, 9);
}

#[test]
fn party_draws_exactly_one_roll() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let party = vec![rogue(&rules, "A", 10, 0), rogue(&rules, "B", 10, 1)];
    let mut draws = 0;
    rules
        .resolve_party_skill_check(&party, "Stealth", 10, || {
            draws += 1;
            10
        })
        .unwrap();
    assert_eq!(draws, 1);
}

#[test]
fn empty_party_is_an_error() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    assert!(matches!(
        rules.resolve_party_skill_check(&[], "Stealth", 10, || 10),
        Err(RulesError::EmptyParty)
    ));
}
