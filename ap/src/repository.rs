//! Plan persistence
//!
//! `PlanRepository` is the seam between plan logic and storage. The store
//! implementation keeps plans in the planstore `plans` collection; the
//! in-memory one backs tests.

use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{Plan, Store};
use crate::error::PlanError;

fn storage(e: eyre::Report) -> PlanError {
    PlanError::Storage(format!("{:#}", e))
}

/// Where plans live
pub trait PlanRepository: Send + Sync {
    /// All plans, oldest first
    fn load_plans(&self) -> Result<Vec<Plan>, PlanError>;

    /// Persist a new plan
    fn append_plan(&self, plan: &Plan) -> Result<(), PlanError>;

    /// Replace a stored plan with the same id
    fn update_plan(&self, plan: &Plan) -> Result<(), PlanError>;

    /// Find a plan by id
    fn find_plan(&self, id: &str) -> Result<Plan, PlanError> {
        self.load_plans()?
            .into_iter()
            .find(|p| p.id.to_string() == id)
            .ok_or_else(|| PlanError::PlanNotFound(id.to_string()))
    }

    /// Most recently created plan, if any
    fn latest_plan(&self) -> Result<Option<Plan>, PlanError> {
        Ok(self.load_plans()?.into_iter().max_by_key(|p| p.id))
    }

    /// Flip completion of the task on `date` and persist, returning the new value
    fn toggle_task(&self, id: &str, date: NaiveDate) -> Result<bool, PlanError> {
        let mut plan = self.find_plan(id)?;
        let completed = plan.toggle_completed(date)?;
        self.update_plan(&plan)?;
        Ok(completed)
    }
}

/// Plans kept in a planstore `Store`
pub struct StoreRepository {
    store: Store,
}

impl StoreRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, PlanError> {
        let store = Store::open(path).map_err(storage)?;
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl PlanRepository for StoreRepository {
    fn load_plans(&self) -> Result<Vec<Plan>, PlanError> {
        let plans = self.store.list::<Plan>().map_err(storage)?;
        debug!(count = plans.len(), "load_plans: done");
        Ok(plans)
    }

    fn append_plan(&self, plan: &Plan) -> Result<(), PlanError> {
        self.store.append(plan).map_err(storage)?;
        info!(id = plan.id, goal = %plan.goal, "Saved plan");
        Ok(())
    }

    fn update_plan(&self, plan: &Plan) -> Result<(), PlanError> {
        if self.store.update(plan).map_err(storage)? {
            Ok(())
        } else {
            Err(PlanError::PlanNotFound(plan.id.to_string()))
        }
    }

    fn find_plan(&self, id: &str) -> Result<Plan, PlanError> {
        self.store
            .find::<Plan>(id)
            .map_err(storage)?
            .ok_or_else(|| PlanError::PlanNotFound(id.to_string()))
    }

    // Runs entirely under the store's exclusive lock
    fn toggle_task(&self, id: &str, date: NaiveDate) -> Result<bool, PlanError> {
        let outcome = self
            .store
            .modify::<Plan, _, _>(id, |plan| Ok(plan.toggle_completed(date)))
            .map_err(storage)?;
        match outcome {
            Some(result) => {
                let completed = result?;
                info!(id, %date, completed, "Toggled task");
                Ok(completed)
            }
            None => Err(PlanError::PlanNotFound(id.to_string())),
        }
    }
}

/// Plans held in memory
#[derive(Default)]
pub struct MemoryRepository {
    plans: Mutex<Vec<Plan>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Plan>>, PlanError> {
        self.plans
            .lock()
            .map_err(|_| PlanError::Storage("plan list lock poisoned".to_string()))
    }
}

impl PlanRepository for MemoryRepository {
    fn load_plans(&self) -> Result<Vec<Plan>, PlanError> {
        Ok(self.lock()?.clone())
    }

    fn append_plan(&self, plan: &Plan) -> Result<(), PlanError> {
        let mut plans = self.lock()?;
        if plans.iter().any(|p| p.id == plan.id) {
            return Err(PlanError::Storage(format!("Record {} already exists in plans", plan.id)));
        }
        plans.push(plan.clone());
        Ok(())
    }

    fn update_plan(&self, plan: &Plan) -> Result<(), PlanError> {
        let mut plans = self.lock()?;
        match plans.iter_mut().find(|p| p.id == plan.id) {
            Some(slot) => {
                *slot = plan.clone();
                Ok(())
            }
            None => Err(PlanError::PlanNotFound(plan.id.to_string())),
        }
    }
}
