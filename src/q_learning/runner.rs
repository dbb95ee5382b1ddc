//! Greedy inference over a trained value table

use tracing::debug;

use crate::{
    Result,
    ports::{Simulation, TableRepository},
    q_learning::ValueTable,
    session::{EnvironmentSession, EpisodeOutcome, max_steps},
    taxi::Action,
};

/// Plays episodes by always taking the highest-valued action.
///
/// An episode that exhausts the step budget before terminating is reported
/// as unsolved.
#[derive(Debug, Clone)]
pub struct ValuePolicyRunner {
    table: ValueTable,
    max_steps: usize,
}

impl ValuePolicyRunner {
    pub fn new(table: ValueTable, max_steps: usize) -> Self {
        Self { table, max_steps }
    }

    /// Check the table against the session and budget one pickup plus one
    /// dropoff on the session's grid.
    pub fn for_session<S: Simulation>(
        table: ValueTable,
        session: &EnvironmentSession<S>,
    ) -> Result<Self> {
        table.check_shape(session.state_count(), session.action_count())?;
        let budget = max_steps(session.config().grid_size, 1, 1);
        Ok(Self::new(table, budget))
    }

    /// Load a named table from a repository.
    pub fn load<S: Simulation, R: TableRepository + ?Sized>(
        repository: &R,
        name: &str,
        session: &EnvironmentSession<S>,
    ) -> Result<Self> {
        let table = repository
            .load(name)?
            .into_table(session.state_count(), session.action_count())?;
        Self::for_session(table, session)
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Run one greedy episode from a fresh reset.
    pub fn solve<S: Simulation>(
        &self,
        session: &mut EnvironmentSession<S>,
    ) -> Result<EpisodeOutcome> {
        let (mut state, _) = session.reset()?;
        loop {
            let action = Action::from_index(self.table.greedy_action(state)?)?;
            let transition = session.step(action)?;
            if transition.terminated {
                return Ok(session.outcome(true));
            }
            if session.metrics().steps >= self.max_steps {
                debug!(budget = self.max_steps, "step budget exhausted");
                return Ok(session.outcome(false));
            }
            state = transition.state;
        }
    }
}
