use super::{CriterionPhase, OptimizerState, StoppingCriterion};

/// Several criteria combined: stops as soon as any member asks to.
///
/// Every member is checked on every iteration, so stateful criteria such as
/// `MaxIterationsWithoutImprovement` see the full fitness history even when
/// another member stops first.
#[derive(Debug, Default)]
pub struct StoppingSet {
    criteria: Vec<Box<dyn StoppingCriterion>>,
}

impl StoppingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, criterion: impl StoppingCriterion + 'static) -> Self {
        self.push(Box::new(criterion));
        self
    }

    pub fn push(&mut self, criterion: Box<dyn StoppingCriterion>) {
        self.criteria.push(criterion);
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Names of the members that have latched `Stopped`.
    pub fn stopped_by(&self) -> Vec<&'static str> {
        self.criteria
            .iter()
            .filter(|c| c.phase() == CriterionPhase::Stopped)
            .map(|c| c.name())
            .collect()
    }
}

impl FromIterator<Box<dyn StoppingCriterion>> for StoppingSet {
    fn from_iter<I: IntoIterator<Item = Box<dyn StoppingCriterion>>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

impl StoppingCriterion for StoppingSet {
    fn name(&self) -> &'static str {
        "any_of"
    }

    fn start(&mut self) {
        for criterion in &mut self.criteria {
            criterion.start();
        }
    }

    fn check_stopping(&mut self, state: &dyn OptimizerState) -> bool {
        let mut stop = false;
        for criterion in &mut self.criteria {
            stop |= criterion.check_stopping(state);
        }
        stop
    }

    fn phase(&self) -> CriterionPhase {
        if self.criteria.iter().any(|c| c.phase() == CriterionPhase::Stopped) {
            CriterionPhase::Stopped
        } else if self.criteria.iter().any(|c| c.phase() == CriterionPhase::Active) {
            CriterionPhase::Active
        } else {
            CriterionPhase::Created
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopping::{IterationSnapshot, MaxIterations, MaxIterationsWithoutImprovement};

    #[test]
    fn stops_when_any_member_stops() {
        let mut set = StoppingSet::new()
            .with(MaxIterations::with_bound(100))
            .with(MaxIterationsWithoutImprovement::with_settings(2, 0.5));
        set.start();
        assert_eq!(set.phase(), CriterionPhase::Active);

        assert!(!set.check_stopping(&IterationSnapshot::new(0, 1.0)));
        assert!(!set.check_stopping(&IterationSnapshot::new(1, 1.0)));
        assert!(!set.check_stopping(&IterationSnapshot::new(2, 1.0)));
        assert!(set.check_stopping(&IterationSnapshot::new(3, 1.0)));
        assert_eq!(set.stopped_by(), vec!["max_iterations_without_improvement"]);
        assert_eq!(set.phase(), CriterionPhase::Stopped);
    }

    #[test]
    fn empty_set_never_stops() {
        let mut set = StoppingSet::new();
        set.start();
        assert!(set.is_empty());
        assert!(!set.check_stopping(&IterationSnapshot::new(u64::MAX, 0.0)));
        assert_eq!(set.phase(), CriterionPhase::Created);
    }

    #[test]
    fn collects_boxed_criteria() {
        let set: StoppingSet = vec![
            Box::new(MaxIterations::with_bound(1)) as Box<dyn StoppingCriterion>,
            Box::new(MaxIterations::with_bound(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }
}
