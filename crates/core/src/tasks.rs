//! Task tracking - collection goals and their progress
//!
//! A session plays through the predefined task table in order; once the
//! table is exhausted, every subsequent task is randomly generated within
//! the documented ranges. The book only tracks numbers; board resets and
//! phase changes on task transitions belong to the session.

use log::info;

use trimatch_types::{
    Task, TaskOutcome, TaskProgress, PREDEFINED_TASKS, RANDOM_TASK_COUNT_MAX,
    RANDOM_TASK_COUNT_MIN, RANDOM_TASK_MOVES_MAX, RANDOM_TASK_MOVES_MIN,
};

use crate::rng::ShapeRng;

/// The active task plus progress toward it
#[derive(Debug, Clone)]
pub struct TaskBook {
    index: usize,
    task: Task,
    progress: TaskProgress,
}

impl TaskBook {
    /// Create a book positioned at the first predefined task
    pub fn new(rng: &mut ShapeRng) -> Self {
        let mut book = Self {
            index: 0,
            task: PREDEFINED_TASKS[0],
            progress: TaskProgress::default(),
        };
        book.load(rng);
        book
    }

    /// Load the task at the current index and reset progress
    ///
    /// Indices beyond the predefined table generate a random task.
    pub fn load(&mut self, rng: &mut ShapeRng) {
        self.task = match PREDEFINED_TASKS.get(self.index) {
            Some(task) => {
                info!(
                    "loaded task {}: collect {} {} in {} moves",
                    self.index + 1,
                    task.count,
                    task.shape.as_str(),
                    task.moves
                );
                *task
            }
            None => {
                let task = Self::generate(rng);
                info!(
                    "new random task: collect {} {} in {} moves",
                    task.count,
                    task.shape.as_str(),
                    task.moves
                );
                task
            }
        };
        self.progress = TaskProgress {
            collected: 0,
            moves_left: self.task.moves,
            task_score: 0,
        };
    }

    /// Roll a random task within the documented ranges
    fn generate(rng: &mut ShapeRng) -> Task {
        Task {
            shape: rng.draw(),
            count: rng.range_inclusive(RANDOM_TASK_COUNT_MIN, RANDOM_TASK_COUNT_MAX),
            moves: rng.range_inclusive(RANDOM_TASK_MOVES_MIN, RANDOM_TASK_MOVES_MAX),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn progress(&self) -> TaskProgress {
        self.progress
    }

    /// Count collected tiles of the task shape
    pub fn record_collected(&mut self, count: u32) {
        self.progress.collected += count;
    }

    /// Accrue points toward the task score
    pub fn accrue_points(&mut self, points: u32) {
        self.progress.task_score += points;
    }

    /// Consume one move from the budget
    pub fn spend_move(&mut self) {
        self.progress.moves_left = self.progress.moves_left.saturating_sub(1);
    }

    /// Give back a move after a swap that produced no match
    pub fn refund_move(&mut self) {
        self.progress.moves_left += 1;
    }

    /// Terminal-state check; success is evaluated before failure
    pub fn check(&self) -> TaskOutcome {
        if self.progress.collected >= self.task.count {
            TaskOutcome::Success
        } else if self.progress.moves_left == 0 {
            TaskOutcome::Failure
        } else {
            TaskOutcome::None
        }
    }

    /// Move to the next task after a success; the caller reloads
    pub fn advance(&mut self) {
        self.index += 1;
    }

    /// Take the accrued task score, leaving zero (banked on success,
    /// discarded on failure)
    pub fn take_task_score(&mut self) -> u32 {
        std::mem::take(&mut self.progress.task_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimatch_types::ShapeId;

    fn rng() -> ShapeRng {
        ShapeRng::new(1, 3)
    }

    #[test]
    fn test_book_starts_at_first_predefined_task() {
        let book = TaskBook::new(&mut rng());
        assert_eq!(book.index(), 0);
        assert_eq!(book.task(), Task::new(ShapeId(0), 10, 3));
        assert_eq!(book.progress().moves_left, 3);
        assert_eq!(book.progress().collected, 0);
    }

    #[test]
    fn test_load_walks_the_predefined_table() {
        let mut r = rng();
        let mut book = TaskBook::new(&mut r);
        for expected in PREDEFINED_TASKS.iter().skip(1) {
            book.advance();
            book.load(&mut r);
            assert_eq!(book.task(), *expected);
        }
    }

    #[test]
    fn test_index_past_table_generates_within_ranges() {
        let mut r = rng();
        let mut book = TaskBook::new(&mut r);
        for _ in 0..PREDEFINED_TASKS.len() {
            book.advance();
        }
        for _ in 0..20 {
            book.load(&mut r);
            let task = book.task();
            assert!(task.shape.index() < 3);
            assert!((RANDOM_TASK_COUNT_MIN..=RANDOM_TASK_COUNT_MAX).contains(&task.count));
            assert!((RANDOM_TASK_MOVES_MIN..=RANDOM_TASK_MOVES_MAX).contains(&task.moves));
        }
    }

    #[test]
    fn test_check_prefers_success_over_failure() {
        let mut book = TaskBook::new(&mut rng());
        assert_eq!(book.check(), TaskOutcome::None);

        // Exhaust moves and reach the target in the same cascade: success.
        book.record_collected(book.task().count);
        for _ in 0..book.task().moves {
            book.spend_move();
        }
        assert_eq!(book.check(), TaskOutcome::Success);
    }

    #[test]
    fn test_moves_exhausted_without_target_is_failure() {
        let mut book = TaskBook::new(&mut rng());
        for _ in 0..book.task().moves {
            book.spend_move();
        }
        assert_eq!(book.check(), TaskOutcome::Failure);
    }

    #[test]
    fn test_refund_restores_the_budget() {
        let mut book = TaskBook::new(&mut rng());
        let before = book.progress().moves_left;
        book.spend_move();
        book.refund_move();
        assert_eq!(book.progress().moves_left, before);
    }

    #[test]
    fn test_take_task_score_leaves_zero() {
        let mut book = TaskBook::new(&mut rng());
        book.accrue_points(120);
        assert_eq!(book.take_task_score(), 120);
        assert_eq!(book.progress().task_score, 0);
    }

    #[test]
    fn test_load_resets_progress() {
        let mut r = rng();
        let mut book = TaskBook::new(&mut r);
        book.record_collected(5);
        book.accrue_points(50);
        book.spend_move();

        book.load(&mut r);
        assert_eq!(book.progress(), TaskProgress {
            collected: 0,
            moves_left: book.task().moves,
            task_score: 0,
        });
    }
}
