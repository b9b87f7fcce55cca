//! Args command - print the synthesized helm option list

use chartgoal_helm::prepare_install;

use crate::context::{GlobalArgs, GoalContext};
use crate::error::Result;

pub async fn run(global: &GlobalArgs) -> Result<()> {
    let context = GoalContext::load(global)?;
    let registration = context.goals.deploy_registration()?;

    let (_, _, args) = prepare_install(&registration, &context.config, &context.invocation).await?;
    for arg in args {
        println!("{}", arg);
    }
    Ok(())
}
