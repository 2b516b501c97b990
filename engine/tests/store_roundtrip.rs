use charsheet_engine::{Catalog, CharacterStore, JsonFileStore, MemoryStore, Roster, Rules};

#[test]
fn memory_store_round_trip_is_identical() {
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);
    let mut c = rules.create_character("Aria");
    rules.adjust_attribute(&mut c, "Dexterity", 6).unwrap();
    rules.adjust_attribute(&mut c, "Wisdom", -2).unwrap();
    rules.set_skill_points(&mut c, "Stealth", 2).unwrap();
    rules.set_skill_points(&mut c, "Sleight of Hand", 1).unwrap();
    rules.select_class(&mut c, "Bard").unwrap();

    let store = MemoryStore::new();
    store.save(&c).unwrap();
    let loaded = store.list();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], c);
    assert_eq!(
        loaded[0].attributes.keys().collect::<Vec<_>>(),
        c.attributes.keys().collect::<Vec<_>>()
    );
}

#[test]
fn file_store_round_trip_through_roster() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("characters.json"));
    let catalog = Catalog::builtin().unwrap();
    let rules = Rules::new(&catalog);

    let mut roster = Roster::load(&store, &rules);
    assert_eq!(roster.len(), 1);
    roster.add_new(&rules);
    roster.select(1).unwrap();
    rules
        .adjust_attribute(roster.current_mut(), "Intelligence", 4)
        .unwrap();
    for c in roster.characters() {
        store.save(c).unwrap();
    }

    let reloaded = Roster::load(&store, &rules);
    assert_eq!(reloaded.characters(), roster.characters());
    assert_eq!(reloaded.characters()[1].score("Intelligence").unwrap(), 14);
}
