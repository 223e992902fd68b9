//! Command dispatch for the demo CLI.
//!
//! Every command builds the same sample hierarchy (seven organizational
//! groups over twenty cost records) and exercises the library surface
//! against it.

use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::instrument;

use crate::application::TreeOperations;
use crate::cli::args::{Cli, Commands, SortField};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::display;
use crate::domain::{DiscountedCost, Modification, ModificationGroup, ModificationKind};
use crate::tree::{ModificationTree, OrderBy, Traversal};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    let order = cli
        .order
        .map(Into::into)
        .unwrap_or_else(|| settings.order());

    match &cli.command {
        Some(Commands::Demo) => _demo(order),
        Some(Commands::Tree) => _tree(order),
        Some(Commands::Levels) => _levels(order),
        Some(Commands::Sorted { field, descending }) => _sorted(order, *field, *descending),
        Some(Commands::Completion { shell }) => {
            _completion(*shell);
            Ok(())
        }
        None => Ok(()),
    }
}

struct Sample {
    ops: TreeOperations,
    groups: Vec<Arc<ModificationGroup>>,
    probe: Arc<Modification>,
}

/// The canonical sample hierarchy used by every subcommand.
fn sample(order: OrderBy) -> CliResult<Sample> {
    use ModificationKind::{Add, Modify, Remove};

    let probe = Modification::new("Test1", 10, 2324, Add);
    let global = ModificationGroup::new(
        "Global modifications",
        [
            Arc::clone(&probe),
            Modification::new("Something", 20, 33253, Modify),
            Modification::new("Hiring", 30, 1, Remove),
            Modification::new("Firing", 10, 67, Add),
        ],
    );
    let europe = ModificationGroup::new(
        "Europe",
        [
            Modification::new("Bonuses", 20, -123, Modify),
            Modification::new("Hardware", 30, 33333333, Remove),
            Modification::new("Marketing", 11, 0, Add),
            Modification::new("OverTime", 22, 1, Modify),
        ],
    );
    let district = ModificationGroup::new(
        "District I.",
        [
            Modification::new("Test9", 33, 5, Remove),
            Modification::new("Investment", 15, 34, Add),
            Modification::new("Insurance", 25, 23, Modify),
            Modification::new("Vis Major", 37, 23, Remove),
        ],
    );
    let hungary = ModificationGroup::new(
        "Hungary",
        [
            Modification::new("Extra", 3432, 1, Add),
            Modification::new("Surprise", 7, 33, Modify),
            Modification::new("Name", 3, 87, Remove),
        ],
    );
    let budapest = ModificationGroup::new(
        "Budapest",
        [
            Modification::new("Commute", 9, 120, Add),
            Modification::new("Parking", 14, 60, Modify),
        ],
    );
    let office = ModificationGroup::new(
        "Office",
        [
            Modification::new("Cleaning", 5, 40, Add),
            Modification::new("Catering", 8, 200, Modify),
        ],
    );
    let test = ModificationGroup::new("Test", [Modification::new("Audit", 2, 10, Remove)]);

    let groups = vec![global, europe, district, hungary, budapest, office, test];
    let ops = TreeOperations::new(Arc::new(ModificationTree::new(order)));
    for group in &groups {
        ops.insert(group)?;
    }
    Ok(Sample { ops, groups, probe })
}

#[instrument]
fn _demo(order: OrderBy) -> CliResult<()> {
    let Sample { ops, groups, probe } = sample(order)?;
    let europe = &groups[1];
    let budapest = &groups[4];

    output::header("Sample hierarchy");
    output::info(&display::render(ops.tree()));
    output::action(
        "elements / levels",
        &format!("{} / {}", ops.tree().element_count(), ops.tree().level_count()),
    );

    output::header("Paths and levels");
    output::action("path of Budapest", &ops.path_of(budapest));
    output::action("level of Budapest", &ops.level_of(budapest));

    output::header("Subtree aggregation");
    let leaves = ops.leaves_under(europe)?;
    output::action(
        "leaves under Europe",
        &leaves.iter().map(|m| m.name()).join(", "),
    );
    output::action("subtree cost", &ops.subtree_cost(europe)?);
    output::action("subtree priority", &ops.subtree_priority(europe)?);

    output::header("Level queries");
    if let Some(top) = ops.highest_priority_leaf_at_level(1)? {
        output::action("highest priority at level 1", &top);
    }
    let owner_level = {
        let owner = ops.find_leaf_owner(&probe)?;
        ops.level_of(&owner.group)
    };
    output::action(
        "found by id",
        &ops.find_leaf_by_id(probe.id(), owner_level)?,
    );

    output::header("Ordered traversals");
    output::detail(
        &ops.traverse(Traversal::InOrder)
            .iter()
            .map(|g| g.name().to_string())
            .join(" < "),
    );
    output::detail(
        &ops.traverse(Traversal::ReverseOrder)
            .iter()
            .map(|g| g.name().to_string())
            .join(" > "),
    );

    output::header("Removal and reinsertion");
    output::action("removed Europe", &ops.remove_group(europe));
    output::info(&display::render(ops.tree()));
    ops.insert(europe)?;
    output::success("Europe reinserted at a fresh position");

    output::header("Resolving a modification");
    match probe.resolved() {
        Ok(()) => output::success(&format!("{} resolved", probe.name())),
        Err(e) => output::error(&e),
    }
    if let Err(e) = probe.resolved() {
        output::detail(&format!("second call: {e}"));
    }

    output::header("Cost policies");
    let standard = Modification::new("Regular", 12, 10, ModificationKind::Add);
    let discounted =
        Modification::with_policy("Rebated", 12, 10, ModificationKind::Add, &DiscountedCost);
    output::action("standard total", &standard.total_cost());
    output::action("discounted total", &discounted.total_cost());
    Ok(())
}

#[instrument]
fn _tree(order: OrderBy) -> CliResult<()> {
    let Sample { ops, .. } = sample(order)?;
    output::info(&display::render(ops.tree()));
    Ok(())
}

#[instrument]
fn _levels(order: OrderBy) -> CliResult<()> {
    let Sample { ops, .. } = sample(order)?;
    for level in 0..ops.tree().level_count() {
        let names = ops
            .groups_at_level(level)?
            .iter()
            .map(|g| g.name().to_string())
            .join(", ");
        output::action(&format!("level {level}"), &names);
    }
    Ok(())
}

#[instrument]
fn _sorted(order: OrderBy, field: SortField, descending: bool) -> CliResult<()> {
    let Sample { ops, .. } = sample(order)?;
    let groups = match (field, descending) {
        (SortField::Name, false) => ops.groups_by_name_ascending(),
        (SortField::Name, true) => ops.groups_by_name_descending(),
        (SortField::Priority, false) => ops.groups_by_priority_ascending(),
        (SortField::Priority, true) => ops.groups_by_priority_descending(),
    };
    output::header("Groups");
    for group in &groups {
        output::detail(group);
    }

    let modifications = match (field, descending) {
        (SortField::Name, false) => ops.modifications_by_name_ascending(),
        (SortField::Name, true) => ops.modifications_by_name_descending(),
        (SortField::Priority, false) => ops.modifications_by_priority_ascending(),
        (SortField::Priority, true) => ops.modifications_by_priority_descending(),
    };
    output::header("Modifications");
    for modification in &modifications {
        output::detail(modification);
    }
    Ok(())
}

fn _completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
