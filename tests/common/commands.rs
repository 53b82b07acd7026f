use cog_bundle::command::{factory, CommandFactory};
use cog_bundle::{Command, CommandOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Command that always ends with the same outcome.
pub struct ScriptedCommand {
    outcome: CommandOutcome,
    executions: Arc<AtomicUsize>,
}

impl Command for ScriptedCommand {
    fn execute(&mut self) -> anyhow::Result<CommandOutcome> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

/// Factory plus counters for how often it constructed and ran commands.
pub struct ScriptedFactory {
    pub factory: CommandFactory,
    pub constructed: Arc<AtomicUsize>,
    pub executions: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

pub fn scripted(outcome: CommandOutcome) -> ScriptedFactory {
    let constructed = Arc::new(AtomicUsize::new(0));
    let executions = Arc::new(AtomicUsize::new(0));
    let (built, ran) = (constructed.clone(), executions.clone());

    let factory: CommandFactory = Arc::new(move || {
        built.fetch_add(1, Ordering::SeqCst);
        Box::new(ScriptedCommand {
            outcome: outcome.clone(),
            executions: ran.clone(),
        }) as Box<dyn Command>
    });

    ScriptedFactory {
        factory,
        constructed,
        executions,
    }
}

/// Command that fails with an ordinary error.
pub struct FailingCommand;

impl Command for FailingCommand {
    fn execute(&mut self) -> anyhow::Result<CommandOutcome> {
        let parsed: u32 = "not-a-number".parse()?;
        Ok(CommandOutcome::stop(parsed.to_string()))
    }
}

pub fn failing() -> CommandFactory {
    factory(|| FailingCommand)
}
