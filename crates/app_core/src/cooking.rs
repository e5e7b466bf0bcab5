use crate::navigation::{NavigationError, RouteName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(usize),
    Finished,
}

/// Index-bounded walk through a recipe's instructions. The index never
/// leaves `[0, step_count)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookingProgress {
    recipe_name: String,
    steps: Vec<String>,
    index: usize,
}

impl CookingProgress {
    pub fn new(
        recipe_name: impl Into<String>,
        steps: Vec<String>,
    ) -> Result<Self, NavigationError> {
        let recipe_name = recipe_name.into();
        if recipe_name.trim().is_empty() {
            return Err(NavigationError::MissingParameter {
                route: RouteName::CookingMode,
                parameter: "recipe_name",
            });
        }
        if steps.is_empty() {
            return Err(NavigationError::MissingParameter {
                route: RouteName::CookingMode,
                parameter: "steps",
            });
        }
        Ok(Self {
            recipe_name,
            steps,
            index: 0,
        })
    }

    pub fn recipe_name(&self) -> &str {
        &self.recipe_name
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step(&self) -> &str {
        &self.steps[self.index]
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    pub fn advance(&mut self) -> StepOutcome {
        if self.is_last() {
            StepOutcome::Finished
        } else {
            self.index += 1;
            StepOutcome::Advanced(self.index)
        }
    }

    /// No-op on the first step.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            false
        } else {
            self.index -= 1;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("шаг {i}")).collect()
    }

    #[test]
    fn rejects_empty_parameters() {
        assert!(CookingProgress::new("Суп", Vec::new()).is_err());
        assert!(CookingProgress::new("  ", steps(2)).is_err());
    }

    #[test]
    fn walks_forward_and_finishes_without_leaving_bounds() {
        let mut progress = CookingProgress::new("Суп", steps(3)).expect("progress");
        assert_eq!(progress.current_step(), "шаг 1");
        assert_eq!(progress.advance(), StepOutcome::Advanced(1));
        assert_eq!(progress.advance(), StepOutcome::Advanced(2));
        assert!(progress.is_last());
        assert_eq!(progress.advance(), StepOutcome::Finished);
        assert_eq!(progress.index(), 2);
        assert_eq!(progress.current_step(), "шаг 3");
    }

    #[test]
    fn back_is_a_no_op_on_the_first_step() {
        let mut progress = CookingProgress::new("Суп", steps(2)).expect("progress");
        assert!(!progress.back());
        assert_eq!(progress.index(), 0);
        progress.advance();
        assert!(progress.back());
        assert_eq!(progress.index(), 0);
    }

    #[test]
    fn single_step_recipe_finishes_immediately() {
        let mut progress = CookingProgress::new("Тост", steps(1)).expect("progress");
        assert!(progress.is_last());
        assert_eq!(progress.advance(), StepOutcome::Finished);
    }
}
