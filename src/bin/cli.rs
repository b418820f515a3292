//! Keiba CLI - Command-line interface for horse race index calculation

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use keiba::config::log_filter;
use keiba::core::{compute_odds_stats, validate_odds, CategorySelection, OddsStats};
use keiba::data::{load_horses, sample, save_race_odds, sheet_for_race, update_horse_odds};
use keiba::predictor::IndexPredictor;
use keiba::robot::store::DEFAULT_ROBOT_FILE;
use keiba::robot::wizard::DEFAULT_ROOT_INDEX;
use keiba::robot::{JsonFileRobotStore, LearningThought, RobotStore, RobotWizard, WizardStep};
use keiba::{CalculationResult, Horse, Race, RobotDefinition};

/// Default odds directory (relative to working directory)
const DEFAULT_ODDS_DIR: &str = "data/odds";

#[derive(Parser)]
#[command(name = "keiba")]
#[command(author, version, about = "Horse race index CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the robot store (JSON)
    #[arg(long, global = true, default_value = DEFAULT_ROBOT_FILE)]
    store: PathBuf,

    /// Path to odds directory
    #[arg(long, global = true, default_value = DEFAULT_ODDS_DIR)]
    odds_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate indices for a race
    Score {
        /// Horses JSON file (defaults to the sample field)
        #[arg(long)]
        horses: Option<PathBuf>,

        /// Race id whose saved odds override the horses' odds
        #[arg(long)]
        race: Option<u32>,

        /// Saved robot to score with
        #[arg(long, conflicts_with_all = ["root", "categories"])]
        robot: Option<u64>,

        /// Root index (0-100)
        #[arg(long)]
        root: Option<f64>,

        /// Category ids in priority order, e.g. 1,3,5,7
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<u32>>,

        /// Number of top horses to show
        #[arg(long, default_value = "18")]
        top: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Odds sheet commands
    Odds {
        #[command(subcommand)]
        command: OddsCommands,
    },

    /// List races
    Races,

    /// List scoring categories
    Categories,

    /// Saved robot commands
    Robots {
        #[command(subcommand)]
        command: RobotCommands,
    },

    /// Create a robot interactively
    Wizard,
}

#[derive(Subcommand)]
enum OddsCommands {
    /// Show odds statistics
    Stats {
        /// Race id of a saved odds sheet
        #[arg(long)]
        race: Option<u32>,

        /// Horses JSON file
        #[arg(long, conflicts_with = "race")]
        horses: Option<PathBuf>,
    },

    /// Show a race's odds sheet
    Show {
        #[arg(long)]
        race: u32,
    },

    /// Enter odds for one horse and save the sheet
    Set {
        #[arg(long)]
        race: u32,

        #[arg(long)]
        horse: u32,

        #[arg(long)]
        odds: f64,
    },
}

#[derive(Subcommand)]
enum RobotCommands {
    /// List saved robots
    List,

    /// Show a robot's settings
    Show { id: u64 },

    /// Delete a robot
    Delete {
        id: u64,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(if cli.verbose {
            EnvFilter::new("debug")
        } else {
            log_filter("warn")
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let store = JsonFileRobotStore::new(&cli.store);

    match cli.command {
        Commands::Score {
            horses,
            race,
            robot,
            root,
            categories,
            top,
            json,
        } => {
            run_score(
                &store,
                &cli.odds_dir,
                horses.as_deref(),
                race,
                robot,
                root,
                categories,
                top,
                json,
            )?;
        }
        Commands::Odds { command } => match command {
            OddsCommands::Stats { race, horses } => {
                run_odds_stats(&cli.odds_dir, race, horses.as_deref())?
            }
            OddsCommands::Show { race } => run_odds_show(&cli.odds_dir, race)?,
            OddsCommands::Set { race, horse, odds } => {
                run_odds_set(&cli.odds_dir, race, horse, odds)?
            }
        },
        Commands::Races => list_races(&cli.odds_dir),
        Commands::Categories => list_categories(),
        Commands::Robots { command } => match command {
            RobotCommands::List => list_robots(&store)?,
            RobotCommands::Show { id } => show_robot(&store, id)?,
            RobotCommands::Delete { id, yes } => delete_robot(&store, id, yes)?,
        },
        Commands::Wizard => run_wizard(&store)?,
    }

    Ok(())
}

fn find_race(race_id: u32) -> Result<Race> {
    sample::races()
        .into_iter()
        .find(|r| r.id == race_id)
        .with_context(|| format!("Unknown race id {}", race_id))
}

/// Field for scoring: horses file or sample field, with saved odds applied
fn load_field(odds_dir: &Path, horses: Option<&Path>, race: Option<u32>) -> Result<Vec<Horse>> {
    let mut field = match horses {
        Some(path) => load_horses(path)
            .with_context(|| format!("Failed to load horses from {:?}", path))?,
        None => sample::horses(),
    };

    if let Some(race_id) = race {
        let race = find_race(race_id)?;
        let sheet = sheet_for_race(odds_dir, &race, &field);
        for (horse, odds) in field.iter_mut().zip(&sheet.horses) {
            if odds.odds > 0.0 {
                horse.odds = odds.odds;
            }
        }
        debug!("Applied saved odds for race {}", race_id);
    }

    Ok(field)
}

#[allow(clippy::too_many_arguments)]
fn run_score(
    store: &dyn RobotStore,
    odds_dir: &Path,
    horses: Option<&Path>,
    race: Option<u32>,
    robot_id: Option<u64>,
    root: Option<f64>,
    categories: Option<Vec<u32>>,
    top: usize,
    json: bool,
) -> Result<()> {
    let catalog = sample::categories();

    let (label, predictor) = match robot_id {
        Some(id) => {
            let robot = store
                .get(id)?
                .with_context(|| format!("Robot {} not found", id))?;
            let predictor = IndexPredictor::from_robot(&robot, &catalog)?;
            (robot.robot_name, predictor)
        }
        None => {
            let root = root.unwrap_or(DEFAULT_ROOT_INDEX);
            if !(0.0..=100.0).contains(&root) {
                bail!("Root index must be 0-100, got {}", root);
            }
            let ids = categories
                .context("Specify --robot or --categories (4 ids in priority order)")?;
            let selection = CategorySelection::from_ids(&ids, &catalog)?;
            ("custom".to_string(), IndexPredictor::new(root, selection))
        }
    };

    let field = load_field(odds_dir, horses, race)?;
    if field.is_empty() {
        println!("{}", "No horses to score.".red());
        return Ok(());
    }
    if let Some(horse) = field.iter().find(|h| !validate_odds(h.odds)) {
        bail!(
            "Odds for horse {} must be greater than 0 and at most 1000, got {}",
            horse.id,
            horse.odds
        );
    }

    let results = predictor.predict_ranked(&field);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!(
        "{}: {} / 根幹指数 {} (入力値 {})",
        "Scoring".green(),
        label,
        predictor.base_index(),
        predictor.root_index()
    );
    println!();

    println!("{}", "傾向パラメータ (Categories):".yellow().bold());
    for ranked in predictor.selection().ranked() {
        println!(
            "  {}位 {:<10} 複勝率 {:.2} 効率 {:.2} 係数 {:.1}",
            ranked.rank,
            ranked.category.name,
            ranked.category.place_rate,
            ranked.category.efficiency,
            ranked.weight()
        );
    }
    println!();

    print_results(&results, top);
    println!();
    print_odds_stats(&compute_odds_stats(&field));

    Ok(())
}

fn print_results(results: &[CalculationResult], top: usize) {
    println!("{}", "指数ランキング (Ranking):".yellow().bold());
    println!(
        "{:>4} {:<20} {:>8} {:>8} {:>8} {:>8}",
        "順位", "馬名", "根幹", "能力", "傾向", "総合"
    );
    println!("{}", "-".repeat(64));

    for (i, r) in results.iter().take(top).enumerate() {
        let line = format!(
            "{:>4} {:<20} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            i + 1,
            truncate_name(&r.horse_name, 20),
            r.base_index,
            r.ability_index,
            r.tendency_index,
            r.total_index
        );
        if i < 3 {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}

fn print_odds_stats(stats: &OddsStats) {
    println!("{}", "オッズ統計 (Odds):".yellow().bold());
    println!("  対象頭数: {}", stats.count);
    println!("  平均オッズ: {:.2}", stats.mean);
    println!("  オッズ分散: {:.2}", stats.variance);
}

fn run_odds_stats(odds_dir: &Path, race: Option<u32>, horses: Option<&Path>) -> Result<()> {
    let stats = match (race, horses) {
        (Some(race_id), _) => {
            let race = find_race(race_id)?;
            let sheet = sheet_for_race(odds_dir, &race, &sample::horses());
            println!("{}: {}", "Race".green(), sheet.race_name);
            compute_odds_stats(&sheet.horses)
        }
        (None, Some(path)) => {
            let field = load_horses(path)
                .with_context(|| format!("Failed to load horses from {:?}", path))?;
            compute_odds_stats(&field)
        }
        (None, None) => compute_odds_stats(&sample::horses()),
    };

    print_odds_stats(&stats);
    Ok(())
}

fn run_odds_show(odds_dir: &Path, race_id: u32) -> Result<()> {
    let race = find_race(race_id)?;
    let sheet = sheet_for_race(odds_dir, &race, &sample::horses());

    println!("{}: {}", "Race".green(), sheet.race_name);
    if let Some(updated) = &sheet.updated_at {
        println!("Updated: {}", updated);
    }
    println!();
    println!("{:>4} {:<20} {:>8} {:>8}", "馬番", "馬名", "オッズ", "能力");
    println!("{}", "-".repeat(44));

    for horse in &sheet.horses {
        if horse.odds > 0.0 {
            println!(
                "{:>4} {:<20} {:>8.1} {:>8.2}",
                horse.horse_number,
                truncate_name(&horse.horse_name, 20),
                horse.odds,
                horse.ability_index.unwrap_or(0.0)
            );
        } else {
            println!(
                "{:>4} {:<20} {:>8} {:>8}",
                horse.horse_number,
                truncate_name(&horse.horse_name, 20),
                "-".dimmed(),
                "-".dimmed()
            );
        }
    }
    println!();
    print_odds_stats(&compute_odds_stats(&sheet.horses));

    Ok(())
}

fn run_odds_set(odds_dir: &Path, race_id: u32, horse_id: u32, odds: f64) -> Result<()> {
    if !validate_odds(odds) {
        bail!("Odds must be greater than 0 and at most 1000, got {}", odds);
    }

    let race = find_race(race_id)?;
    let mut sheet = sheet_for_race(odds_dir, &race, &sample::horses());
    if !update_horse_odds(&mut sheet, horse_id, odds) {
        bail!("Horse {} is not entered in race {}", horse_id, race_id);
    }

    let path = save_race_odds(odds_dir, &sheet)?;
    println!("{}: {:?}", "Saved".green(), path);
    Ok(())
}

fn list_races(odds_dir: &Path) {
    println!("{}", "Races:".yellow().bold());
    println!("{:>4} {:<28} {:<12} {}", "ID", "レース名", "日付", "オッズ");
    println!("{}", "-".repeat(56));

    for race in sample::races() {
        let odds = if keiba::data::race_odds_exists(odds_dir, race.id) {
            "入力済".green()
        } else {
            "未入力".dimmed()
        };
        println!("{:>4} {:<28} {:<12} {}", race.id, race.name, race.date, odds);
    }
}

fn list_categories() {
    println!("{}", "Categories:".yellow().bold());
    println!("{:>4} {:<12} {:>8} {:>8}", "ID", "名前", "複勝率", "効率");
    println!("{}", "-".repeat(36));
    for c in sample::categories() {
        println!(
            "{:>4} {:<12} {:>8.2} {:>8.2}",
            c.id, c.name, c.place_rate, c.efficiency
        );
    }
}

fn list_robots(store: &dyn RobotStore) -> Result<()> {
    let robots = store.list()?;
    if robots.is_empty() {
        println!("{}", "No robots saved yet. Run `keiba wizard` to create one.".yellow());
        return Ok(());
    }

    println!("{} ({}台)", "AIロボット一覧:".yellow().bold(), robots.len());
    println!(
        "{:>14} {:<24} {:>6} {:<14} {}",
        "ID", "名前", "根幹", "思考", "作成日時"
    );
    println!("{}", "-".repeat(80));
    for robot in &robots {
        println!(
            "{:>14} {:<24} {:>6.1} {:<14} {}",
            robot.id,
            truncate_name(&robot.robot_name, 24),
            robot.base_index(),
            robot.learning_thought.title(),
            robot.created_at.format("%Y/%m/%d %H:%M")
        );
    }
    Ok(())
}

fn print_robot(robot: &RobotDefinition) {
    println!("{} {}", "Robot:".yellow().bold(), robot.robot_name);
    println!(
        "  根幹指数: {} (入力値 {})",
        robot.base_index(),
        robot.root_index
    );

    let mut params = robot.tendency_params.clone();
    params.sort_by_key(|p| p.priority);
    println!("  傾向パラメータ:");
    for p in &params {
        println!("    優先度{} {}", p.priority, p.name);
    }

    println!("  レース傾向パラメータ:");
    for group in &robot.race_params {
        let subs: Vec<String> = group
            .sub_categories
            .iter()
            .map(|s| format!("{}({})", s.name, s.priority))
            .collect();
        println!("    {}: {}", group.category, subs.join(", "));
    }

    println!("  学習的思考: {}", robot.learning_thought.title());
}

fn show_robot(store: &dyn RobotStore, id: u64) -> Result<()> {
    let robot = store
        .get(id)?
        .with_context(|| format!("Robot {} not found", id))?;
    print_robot(&robot);
    Ok(())
}

fn delete_robot(store: &dyn RobotStore, id: u64, yes: bool) -> Result<()> {
    let robot = store
        .get(id)?
        .with_context(|| format!("Robot {} not found", id))?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "「{}」を削除しますか？この操作は取り消せません。",
                robot.robot_name
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(id)?;
    println!("{}: {}", "Deleted".green(), robot.robot_name);
    Ok(())
}

fn run_wizard(store: &dyn RobotStore) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut wizard = RobotWizard::new();

    loop {
        let step = wizard.step();
        println!();
        println!(
            "{}",
            format!("ステップ {} / 5: {}", step.number(), step.title())
                .cyan()
                .bold()
        );

        match step {
            WizardStep::RootIndex => {
                let root: f64 = Input::with_theme(&theme)
                    .with_prompt("根幹指数の入力値 (0-100)")
                    .default(wizard.root_index())
                    .validate_with(|v: &f64| {
                        if (0.0..=100.0).contains(v) {
                            Ok(())
                        } else {
                            Err("0〜100の範囲で入力してください")
                        }
                    })
                    .interact_text()?;
                wizard.set_root_index(root);
                println!("根幹指数: {} × 0.5 = {}点", root, root * 0.5);
            }
            WizardStep::TendencyParams => prompt_tendency(&theme, &mut wizard)?,
            WizardStep::RaceParams => prompt_race_params(&theme, &mut wizard)?,
            WizardStep::LearningThought => {
                let labels: Vec<String> = LearningThought::ALL
                    .iter()
                    .map(|t| format!("{} - {}", t.title(), t.description()))
                    .collect();
                let choice = Select::with_theme(&theme)
                    .with_prompt("学習的思考")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                wizard.set_learning_thought(LearningThought::ALL[choice]);
            }
            WizardStep::Save => {
                let name: String = Input::with_theme(&theme)
                    .with_prompt("ロボット名 (50文字以内)")
                    .validate_with(|v: &String| {
                        if v.trim().is_empty() {
                            Err("ロボット名を入力してください")
                        } else {
                            Ok(())
                        }
                    })
                    .interact_text()?;
                wizard.set_robot_name(&name);

                let robot = wizard.finish(Utc::now())?;
                println!();
                print_robot(&robot);

                let save = Confirm::with_theme(&theme)
                    .with_prompt("この内容で保存しますか？")
                    .default(true)
                    .interact()?;
                if save {
                    let saved = store.save(robot)?;
                    println!("{}: {} (ID {})", "Saved".green(), saved.robot_name, saved.id);
                } else {
                    println!("Cancelled.");
                }
                return Ok(());
            }
        }

        if let Err(e) = wizard.next() {
            println!("{}: {}", "Incomplete".red(), e);
        }
    }
}

fn prompt_tendency(theme: &ColorfulTheme, wizard: &mut RobotWizard) -> Result<()> {
    let options = wizard.tendency_catalog().to_vec();
    let labels: Vec<String> = options
        .iter()
        .map(|o| format!("{} - {}", o.name, o.description))
        .collect();

    let chosen = loop {
        let chosen = MultiSelect::with_theme(theme)
            .with_prompt("傾向パラメータを4つ選択 (スペースで選択)")
            .items(&labels)
            .interact()?;
        if chosen.len() == 4 {
            break chosen;
        }
        println!("{}", format!("4つ選択してください ({}個選択中)", chosen.len()).red());
    };

    // Priority order: pick rank 1..3, the last one is rank 4
    let mut remaining = chosen;
    let mut ordered = Vec::with_capacity(4);
    for rank in 1..4 {
        let names: Vec<&str> = remaining.iter().map(|&i| options[i].name).collect();
        let pick = Select::with_theme(theme)
            .with_prompt(format!("優先度{}", rank))
            .items(&names)
            .default(0)
            .interact()?;
        ordered.push(remaining.remove(pick));
    }
    ordered.extend(remaining);

    for id in wizard.tendency_params().iter().map(|p| p.id).collect::<Vec<_>>() {
        wizard.toggle_tendency(id);
    }
    for i in ordered {
        wizard.toggle_tendency(options[i].id);
    }
    Ok(())
}

fn prompt_race_params(theme: &ColorfulTheme, wizard: &mut RobotWizard) -> Result<()> {
    let groups = wizard.race_catalog().to_vec();
    let labels: Vec<&str> = groups.iter().map(|g| g.category).collect();

    let chosen = loop {
        let chosen = MultiSelect::with_theme(theme)
            .with_prompt("レース傾向パラメータを3つ選択")
            .items(&labels)
            .interact()?;
        if chosen.len() == 3 {
            break chosen;
        }
        println!("{}", format!("3つ選択してください ({}個選択中)", chosen.len()).red());
    };

    for category in wizard
        .race_params()
        .iter()
        .map(|p| p.category.clone())
        .collect::<Vec<_>>()
    {
        wizard.toggle_race_category(&category);
    }

    for i in chosen {
        let group = &groups[i];
        wizard.toggle_race_category(group.category);

        let sub_labels: Vec<String> = group
            .sub_categories
            .iter()
            .map(|s| format!("{} - {}", s.name, s.description))
            .collect();
        let defaults: Vec<bool> = (0..sub_labels.len()).map(|j| j < 4).collect();

        let subs = loop {
            let subs = MultiSelect::with_theme(theme)
                .with_prompt(format!("{}: 詳細項目 (最大4つ)", group.category))
                .items(&sub_labels)
                .defaults(&defaults)
                .interact()?;
            if subs.len() <= 4 {
                break subs;
            }
            println!("{}", "4つまで選択できます".red());
        };

        // Replace the seeded sub-categories with the chosen ones
        let seeded: Vec<u32> = group.sub_categories.iter().take(4).map(|s| s.id).collect();
        for id in seeded {
            wizard.toggle_sub_category(group.category, id);
        }
        for j in subs {
            wizard.toggle_sub_category(group.category, group.sub_categories[j].id);
        }
    }
    Ok(())
}

fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        name.chars().take(max_len - 1).collect::<String>() + "…"
    }
}
