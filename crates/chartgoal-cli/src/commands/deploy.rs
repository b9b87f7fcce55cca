//! Deploy command - run the helm-deploy goal

use console::style;

use chartgoal_helm::{GoalTable, HELM_DEPLOY, deploy_fulfillment};

use crate::context::{GlobalArgs, GoalContext};
use crate::error::Result;

pub async fn run(global: &GlobalArgs) -> Result<()> {
    let context = GoalContext::load(global)?;
    let registration = context.goals.deploy_registration()?;

    println!("{} {}", style("→").blue().bold(), HELM_DEPLOY.working_description);

    let mut table = GoalTable::new();
    table.register(deploy_fulfillment(registration, context.config));
    let outcome = table
        .execute(HELM_DEPLOY.unique_name, context.invocation)
        .await;

    super::report(HELM_DEPLOY, outcome)
}
