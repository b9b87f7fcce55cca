//! Package command - run the helm-package goal

use console::style;

use chartgoal_helm::{GoalTable, HELM_PACKAGE, apply_tracked_version, package_fulfillment};

use crate::context::{GlobalArgs, GoalContext};
use crate::error::Result;

pub async fn run(global: &GlobalArgs) -> Result<()> {
    let context = GoalContext::load(global)?;
    let registration = context.goals.package.clone().unwrap_or_default();

    if let Some(version) = apply_tracked_version(&context.invocation).await? {
        println!("{} Chart version set to {}", style("→").blue(), style(version).yellow());
    }

    println!("{} {}", style("→").blue().bold(), HELM_PACKAGE.working_description);

    let mut table = GoalTable::new();
    table.register(package_fulfillment(registration, context.config));
    let outcome = table
        .execute(HELM_PACKAGE.unique_name, context.invocation)
        .await;

    super::report(HELM_PACKAGE, outcome)
}
