use anyhow::Context;
use charsheet_engine::{
    AdjustOutcome, Catalog, Character, CharacterStore, Dice, JsonFileStore, Roster, Rules,
};
use clap::{ArgAction, Parser, Subcommand};
use encoding_rs::Encoding;
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, warn, Level};

#[derive(Subcommand)]
enum Cmd {
    /// List every character in the roster
    List,
    /// Create a character with default attributes
    New {
        /// Display name (defaults to "Character N")
        #[arg(long)]
        name: Option<String>,
    },
    /// Show attributes, classes and skills of a character
    Show {
        /// Character id or name
        character: String,
    },
    /// Change an attribute by a signed delta, within the point budget
    Adjust {
        /// Character id or name
        character: String,
        attribute: String,
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    /// Select a class (requirements are advisory)
    Class {
        /// Character id or name
        character: String,
        class: String,
    },
    /// Set the points allocated to a skill
    Skill {
        /// Character id or name
        character: String,
        skill: String,
        points: u32,
    },
    /// Roll a skill check for one character
    Check {
        /// Character id or name
        character: String,
        skill: String,
        /// Difficulty Class to meet or beat
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        dc: i32,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Roll a skill check with the party member best at the skill
    PartyCheck {
        skill: String,
        /// Difficulty Class to meet or beat
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        dc: i32,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Add a character from a JSON file to the store
    Import {
        /// Path to JSON file containing a Character
        file: PathBuf,
    },
    /// Serialize a character to JSON (stdout)
    Dump {
        /// Character id or name
        character: String,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Parser)]
#[command(name = "charsheet")]
#[command(about = "Character sheet builder: attributes, classes, skills and checks")]
struct Cli {
    /// JSON file holding the saved roster
    #[arg(long, global = true, default_value = "characters.json")]
    store: PathBuf,
    /// Catalog file (YAML or JSON); the built-in catalog when omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn roller(seed: Option<u64>) -> Dice {
    match seed {
        Some(seed) => Dice::from_seed(seed),
        None => Dice::from_entropy(),
    }
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

/// Make the named character current and hand it back for editing.
fn pick<'r>(roster: &'r mut Roster, key: &str) -> anyhow::Result<&'r mut Character> {
    let index = roster.find(key)?;
    roster.select(index)?;
    Ok(roster.current_mut())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    let rules = Rules::new(&catalog);
    let store = JsonFileStore::new(&cli.store);
    let mut roster = Roster::load(&store, &rules);
    debug!("[CLI] store={} roster={}", store.path().display(), roster.len());

    match cli.cmd {
        Cmd::List => {
            for c in roster.characters() {
                println!(
                    "{} ({}) class={} attributes={}/{}",
                    c.name,
                    c.id,
                    c.selected_class.as_deref().unwrap_or("-"),
                    rules.attribute_sum(c),
                    catalog.max_attribute_sum
                );
            }
        }
        Cmd::New { name } => {
            // number from what is saved; an empty store's seed is never written
            let name = name.unwrap_or_else(|| format!("Character {}", store.list().len() + 1));
            let c = roster.push(rules.create_character(name));
            store.save(c)?;
            println!("created {} ({})", c.name, c.id);
        }
        Cmd::Show { character } => {
            let c = pick(&mut roster, &character)?;
            show(&rules, c)?;
        }
        Cmd::Adjust {
            character,
            attribute,
            delta,
        } => {
            let c = pick(&mut roster, &character)?;
            match rules.adjust_attribute(c, &attribute, delta)? {
                AdjustOutcome::Applied { name, from, to } => {
                    store.save(c)?;
                    println!("{}: {} {} → {}", c.name, name, from, to);
                }
                AdjustOutcome::Rejected(reason) => {
                    let name = catalog.attribute(&attribute)?;
                    println!("{}: {} {:+} rejected ({})", c.name, name, delta, reason);
                }
            }
        }
        Cmd::Class { character, class } => {
            let c = pick(&mut roster, &character)?;
            let qualifies = rules.select_class(c, &class)?;
            store.save(c)?;
            println!(
                "{}: class {} ({})",
                c.name,
                c.selected_class.as_deref().unwrap_or(&class),
                if qualifies { "qualifies" } else { "requirements not met" }
            );
        }
        Cmd::Skill {
            character,
            skill,
            points,
        } => {
            let c = pick(&mut roster, &character)?;
            rules.set_skill_points(c, &skill, points)?;
            store.save(c)?;
            println!(
                "{}: {} = {} (total {:+}, {} point(s) left)",
                c.name,
                catalog.skill(&skill)?.name,
                points,
                rules.skill_total(c, &skill)?,
                rules.remaining_skill_points(c)?
            );
        }
        Cmd::Check {
            character,
            skill,
            dc,
            seed,
        } => {
            let c = pick(&mut roster, &character)?;
            let mut dice = roller(seed);
            let res = rules.resolve_skill_check(c, &skill, dc, || dice.d20())?;
            println!(
                "{} {} (mod={:+}) vs dc={}: {}",
                c.name, res.skill, res.skill_total, res.dc, res
            );
        }
        Cmd::PartyCheck { skill, dc, seed } => {
            let mut dice = roller(seed);
            let res =
                rules.resolve_party_skill_check(roster.characters(), &skill, dc, || dice.d20())?;
            println!("{} (mod={:+}) vs dc={}: {}", res.skill, res.skill_total, res.dc, res);
        }
        Cmd::Import { file } => {
            let text = read_text_auto(&file)?;
            let c: Character = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse character: {}", file.display()))?;
            let c = rules
                .admit(c)
                .with_context(|| format!("rejected character: {}", file.display()))?;
            let c = roster.push(c);
            store.save(c)?;
            println!("imported {} ({})", c.name, c.id);
        }
        Cmd::Dump { character, compact } => {
            let c = pick(&mut roster, &character)?;
            if compact {
                println!("{}", serde_json::to_string(c)?);
            } else {
                println!("{}", serde_json::to_string_pretty(c)?);
            }
        }
    }
    Ok(())
}

fn show(rules: &Rules<'_>, c: &Character) -> anyhow::Result<()> {
    let catalog = rules.catalog();
    println!("{} ({})", c.name, c.id);

    println!(
        "Attributes ({}/{}):",
        rules.attribute_sum(c),
        catalog.max_attribute_sum
    );
    for line in rules.attribute_sheet(c)? {
        println!("  {:<14} {:>3}  modifier {:+}", line.name, line.score, line.modifier);
    }
    if rules.max_reached(c) {
        println!(
            "Max attribute points reached ({}). Adjust other attributes to increase further.",
            catalog.max_attribute_sum
        );
    }

    println!("Classes:");
    for line in rules.class_board(c)? {
        println!(
            "  {} {:<10} {}",
            if line.selected { "*" } else { " " },
            line.name,
            if line.qualifies { "qualifies" } else { "-" }
        );
    }
    if let Some(class) = c.selected_class.as_deref() {
        match catalog.class_requirements(class) {
            Ok(reqs) => {
                let reqs = reqs
                    .iter()
                    .map(|(attr, min)| format!("{attr} {min}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("Requirements for {class}: {reqs}");
            }
            Err(e) => {
                warn!("[CLI][{}] {}", c.name, e);
                println!("Requirements for {class}: unknown class");
            }
        }
    }

    println!(
        "Skills (Points Available: {}, spent {}):",
        rules.available_skill_points(c)?,
        rules.spent_skill_points(c)
    );
    for line in rules.skill_sheet(c)? {
        println!(
            "  {:<16} ({:<12}) points {:>2}  modifier {:+}  total {:+}",
            line.name, line.attribute, line.points, line.modifier, line.total
        );
    }
    Ok(())
}
