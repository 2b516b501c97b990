use charsheet_engine::{AdjustOutcome, Catalog, Rejection, Requirements, Rules};

#[test]
fn budget_caps_increments_at_seventy() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let mut c = rules.create_character("Character 1");
    assert!(c.attributes.values().all(|&v| v == 10));
    assert_eq!(rules.attribute_sum(&c), 60);

    for _ in 0..10 {
        assert!(rules.adjust_attribute(&mut c, "Strength", 1).unwrap().is_applied());
    }
    assert_eq!(rules.attribute_sum(&c), 70);
    assert_eq!(rules.remaining_budget(&c), 0);

    assert_eq!(
        rules.adjust_attribute(&mut c, "Strength", 1).unwrap(),
        AdjustOutcome::Rejected(Rejection::WouldExceedBudget)
    );
    // Another attribute cannot take the point either.
    assert_eq!(
        rules.adjust_attribute(&mut c, "Dexterity", 1).unwrap(),
        AdjustOutcome::Rejected(Rejection::WouldExceedBudget)
    );

    for attr in ["Strength", "Dexterity", "Constitution", "Intelligence", "Wisdom", "Charisma"] {
        let mut copy = c.clone();
        assert!(rules.adjust_attribute(&mut copy, attr, -1).unwrap().is_applied());
    }
}

#[test]
fn intelligence_drives_available_skill_points() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let mut c = rules.create_character("Sage");
    assert_eq!(rules.available_skill_points(&c).unwrap(), 10);
    c.attributes["Intelligence"] = 14;
    assert_eq!(rules.available_skill_points(&c).unwrap(), 18);
}

#[test]
fn empty_requirements_always_qualify() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let mut c = rules.create_character("Nobody");
    for attr in catalog.attributes.clone() {
        c.attributes[attr.as_str()] = 0;
    }
    assert!(rules.qualifies(&c, &Requirements::new()).unwrap());
}

#[test]
fn class_selection_is_never_blocked() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let mut c = rules.create_character("Hopeful");
    assert!(!rules.qualifies_for_class(&c, "Barbarian").unwrap());
    let qualifies = rules.select_class(&mut c, "Barbarian").unwrap();
    assert!(!qualifies);
    assert_eq!(c.selected_class.as_deref(), Some("Barbarian"));

    for _ in 0..4 {
        rules.adjust_attribute(&mut c, "Strength", 1).unwrap();
    }
    assert!(rules.qualifies_for_class(&c, "Barbarian").unwrap());
}

#[test]
fn partial_requirements_only_check_named_attributes() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let mut c = rules.create_character("Scout");
    c.attributes["Wisdom"] = 0;
    let reqs: Requirements = [("Dexterity".to_string(), 10)].into_iter().collect();
    assert!(rules.qualifies(&c, &reqs).unwrap());
    c.attributes["Dexterity"] = 9;
    assert!(!rules.qualifies(&c, &reqs).unwrap());
}

#[test]
fn unknown_class_is_an_error() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let mut c = rules.create_character("Hopeful");
    assert!(rules.select_class(&mut c, "Paladin").is_err());
    assert_eq!(c.selected_class, None);
}
