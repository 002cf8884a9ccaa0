use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kennel_genealogy_core::genetics::{
    calculate_completeness, describe_pedigree, format_pedigree_name, predict_colors, CoiResult,
    ColorPrediction, Genotype, PedigreeNode, RawGenotype, DEFAULT_MAX_COMMON_ANCESTORS,
};
use kennel_genealogy_core::{GenealogyEngine, MemoryDogStore};

#[derive(Parser)]
#[command(name = "kennel-genealogy")]
#[command(version)]
#[command(about = "Inbreeding coefficients, pedigrees and coat colour prediction for dog breeding")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads the kennel file.
#[derive(clap::Args)]
struct KennelArgs {
    /// Path to dogs CSV (columns: id, name, sire, dam; optional sex,
    /// registered_name, birth_date, color, titles, photo_url)
    #[arg(short, long)]
    dogs: String,

    /// Generations to search (1-10, default 5)
    #[arg(short, long)]
    generations: Option<usize>,

    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Inbreeding coefficient of a prospective litter
    Coi {
        #[command(flatten)]
        kennel: KennelArgs,

        /// Sire id
        #[arg(long)]
        sire: String,

        /// Dam id
        #[arg(long)]
        dam: String,

        /// Number of common ancestors to list
        #[arg(long, default_value = "10")]
        max_ancestors: usize,
    },

    /// Inbreeding coefficient of an existing dog from its recorded parents
    DogCoi {
        #[command(flatten)]
        kennel: KennelArgs,

        /// Dog id
        #[arg(long)]
        id: String,
    },

    /// Pedigree tree of a dog
    Pedigree {
        #[command(flatten)]
        kennel: KennelArgs,

        /// Dog id
        #[arg(long)]
        id: String,

        /// Annotate the root with its own COI
        #[arg(long)]
        coi: bool,
    },

    /// Predict litter colours from two genotypes
    Colors {
        /// Sire genotype, compact ("E=E/e B=B/b K=ky/ky A=at/a D=D/d") or JSON
        #[arg(long)]
        sire: String,

        /// Dam genotype, compact or JSON
        #[arg(long)]
        dam: String,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Coi {
            kennel,
            sire,
            dam,
            max_ancestors,
        } => cmd_coi(&kennel, &sire, &dam, max_ancestors),
        Commands::DogCoi { kennel, id } => cmd_dog_coi(&kennel, &id),
        Commands::Pedigree { kennel, id, coi } => cmd_pedigree(&kennel, &id, coi),
        Commands::Colors { sire, dam, format } => cmd_colors(&sire, &dam, &format),
    }
}

fn load_engine(kennel: &KennelArgs, max_ancestors: usize) -> Result<(GenealogyEngine, usize)> {
    let store = MemoryDogStore::from_csv(&kennel.dogs)
        .with_context(|| format!("Failed to load dogs from '{}'", kennel.dogs))?;
    eprintln!("Loaded {} dogs from '{}'", store.len(), kennel.dogs);

    let engine = GenealogyEngine::builder()
        .store(store)
        .max_common_ancestors(max_ancestors)
        .build()
        .context("Invalid engine settings")?;
    let generations = engine
        .resolve_generations(kennel.generations)
        .context("Invalid --generations")?;
    log::debug!(
        "Searching {} generations, listing up to {} common ancestors",
        generations,
        engine.max_common_ancestors()
    );
    Ok((engine, generations))
}

fn is_json(format: &str) -> bool {
    format.eq_ignore_ascii_case("json")
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_coi(kennel: &KennelArgs, sire: &str, dam: &str, max_ancestors: usize) -> Result<()> {
    let (engine, generations) = load_engine(kennel, max_ancestors)?;
    let result = engine
        .compute_coi(sire, dam, generations)
        .with_context(|| format!("Failed to compute COI for {} x {}", sire, dam))?;

    if is_json(&kennel.format) {
        print_json(&result)
    } else {
        println!("Mating {} x {} over {} generations", sire, dam, generations);
        print_coi_text(&result);
        Ok(())
    }
}

fn cmd_dog_coi(kennel: &KennelArgs, id: &str) -> Result<()> {
    let (engine, generations) = load_engine(kennel, DEFAULT_MAX_COMMON_ANCESTORS)?;
    let result = engine
        .compute_dog_coi(id, generations)
        .with_context(|| format!("Failed to compute COI of dog '{}'", id))?;

    match (result, is_json(&kennel.format)) {
        (Some(result), true) => print_json(&result),
        (None, true) => print_json(&serde_json::Value::Null),
        (Some(result), false) => {
            println!("Dog {} over {} generations", id, generations);
            print_coi_text(&result);
            Ok(())
        }
        (None, false) => {
            println!("Dog '{}' not found or parents unknown; no COI", id);
            Ok(())
        }
    }
}

fn print_coi_text(result: &CoiResult) {
    println!(
        "COI: {} ({}, {})",
        result.percentage,
        result.interpretation,
        result.band.risk_color()
    );
    if result.common_ancestors.is_empty() {
        println!("No common ancestors found");
        return;
    }
    println!("\nCommon ancestors:");
    for ancestor in &result.common_ancestors {
        println!(
            "  {:<30} {:>8.3}%  {} path pair(s)",
            ancestor.name,
            ancestor.contribution_percent,
            ancestor.paths.len()
        );
        for pair in &ancestor.paths {
            println!(
                "      {}  |  {}",
                pair.sire_path.join(" > "),
                pair.dam_path.join(" > ")
            );
        }
    }
}

fn cmd_pedigree(kennel: &KennelArgs, id: &str, with_coi: bool) -> Result<()> {
    let (engine, generations) = load_engine(kennel, DEFAULT_MAX_COMMON_ANCESTORS)?;
    let tree = if with_coi {
        engine.build_pedigree_with_coi(id, generations)
    } else {
        engine.build_pedigree(id, generations)
    }
    .with_context(|| format!("Failed to build pedigree of '{}'", id))?;

    let Some(root) = tree else {
        anyhow::bail!("Dog '{}' not found", id);
    };

    if is_json(&kennel.format) {
        return print_json(&root);
    }

    print_tree(&root, 0);
    println!();
    println!("{}", describe_pedigree(Some(&root), generations));
    println!(
        "Completeness: {}%",
        calculate_completeness(Some(&root), generations)
    );
    if let Some(coi) = root.coi {
        println!("COI: {:.2}%", coi * 100.0);
    }
    Ok(())
}

fn print_tree(node: &PedigreeNode, depth: usize) {
    let mut line = format!("{}{}", "  ".repeat(depth), format_pedigree_name(node));
    if let Some(color) = &node.color {
        line.push_str(&format!(" [{}]", color));
    }
    if let Some(born) = node.birth_date {
        line.push_str(&format!(" ({})", born));
    }
    println!("{}", line);
    if let Some(sire) = node.sire.as_deref() {
        print_tree(sire, depth + 1);
    }
    if let Some(dam) = node.dam.as_deref() {
        print_tree(dam, depth + 1);
    }
}

fn parse_genotype(label: &str, input: &str) -> Result<RawGenotype> {
    let input = input.trim();
    let genotype = if input.starts_with('{') {
        Genotype::from_json(input)
    } else {
        input.parse::<Genotype>()
    }
    .with_context(|| format!("Invalid {} genotype", label))?;
    Ok(genotype.to_raw())
}

fn cmd_colors(sire: &str, dam: &str, format: &str) -> Result<()> {
    let sire = parse_genotype("sire", sire)?;
    let dam = parse_genotype("dam", dam)?;
    let predictions = predict_colors(&sire, &dam).context("Colour prediction failed")?;

    if is_json(format) {
        return print_json(&predictions);
    }
    print_colors_text(&predictions);
    Ok(())
}

fn print_colors_text(predictions: &[ColorPrediction]) {
    println!(
        "{:<22} {:>8}  {:<9} {}",
        "Phenotype", "Prob.", "Display", "Example genotype"
    );
    for p in predictions {
        println!(
            "{:<22} {:>7.2}%  {:<9} {}",
            p.phenotype,
            p.probability * 100.0,
            p.display_color,
            p.genotype
        );
        for warning in &p.warnings {
            println!("  warning: {}", warning);
        }
    }
}
