//! Local game against the AI.

use super::ai::{BoardFull, Difficulty, choose_ai_move};
use super::game::GameState;
use super::rules::GameOutcome;
use super::{Player, Position};
use rand::Rng;
use tracing::{debug, info, instrument};

/// A human-versus-AI match.
///
/// X always moves first, so when the human picks O the AI owes the opening
/// move right after [`AiMatch::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiMatch {
    state: GameState,
    human: Player,
    ai: Player,
    difficulty: Difficulty,
    ai_thinking: bool,
}

impl AiMatch {
    /// Starts a match with the human playing `human`.
    #[instrument]
    pub fn start(human: Player, difficulty: Difficulty) -> Self {
        let mut game = Self {
            state: GameState::new(),
            human,
            ai: human.opponent(),
            difficulty,
            ai_thinking: false,
        };
        game.ai_thinking = game.is_ai_turn();
        info!(%human, %difficulty, ai_first = game.ai_thinking, "AI match started");
        game
    }

    /// Restarts with the same marks and difficulty.
    pub fn retry(&self) -> Self {
        Self::start(self.human, self.difficulty)
    }

    /// Returns the game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the human's mark.
    pub fn human(&self) -> Player {
        self.human
    }

    /// Returns the AI's mark.
    pub fn ai(&self) -> Player {
        self.ai
    }

    /// Returns the difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// True between a hand-off to the AI and the AI's move.
    pub fn ai_thinking(&self) -> bool {
        self.ai_thinking
    }

    /// True when the game is live and the AI holds the turn.
    pub fn is_ai_turn(&self) -> bool {
        !self.state.outcome().is_over() && self.state.current_player() == self.ai
    }

    /// True when the human may click a cell.
    pub fn accepts_input(&self) -> bool {
        !self.state.outcome().is_over()
            && self.state.current_player() == self.human
            && !self.ai_thinking
    }

    /// Applies the human's move; ignored unless [`accepts_input`] holds
    /// and the cell is empty.
    ///
    /// If the game continues the match hands off to the AI.
    ///
    /// [`accepts_input`]: AiMatch::accepts_input
    #[instrument(skip(self), fields(human = %self.human))]
    pub fn human_move(&mut self, index: usize) -> bool {
        if !self.accepts_input() {
            debug!("Human move ignored");
            return false;
        }
        if !self.state.apply_move(index, self.human) {
            return false;
        }
        self.ai_thinking = self.is_ai_turn();
        true
    }

    /// Lets the AI move if it holds the turn.
    ///
    /// Returns the chosen position, or `None` when it is not the AI's turn.
    #[instrument(skip(self, rng), fields(ai = %self.ai, difficulty = %self.difficulty))]
    pub fn ai_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<Position>, BoardFull> {
        if !self.is_ai_turn() {
            self.ai_thinking = false;
            return Ok(None);
        }
        let pos = choose_ai_move(self.state.board(), self.ai, self.human, self.difficulty, rng)?;
        let applied = self.state.apply_move(pos.to_index(), self.ai);
        debug_assert!(applied, "AI chose an illegal cell");
        self.ai_thinking = false;
        Ok(Some(pos))
    }

    /// Status line for the player.
    pub fn status(&self) -> String {
        match self.state.outcome() {
            GameOutcome::Draw => "It's a Draw!".to_string(),
            GameOutcome::Win { player, .. } if player == self.human => "You win!".to_string(),
            GameOutcome::Win { .. } => "AI wins!".to_string(),
            GameOutcome::InProgress if self.ai_thinking => {
                format!("AI ({}) is thinking...", self.difficulty)
            }
            GameOutcome::InProgress if self.state.current_player() == self.human => {
                format!("Your turn ({})", self.human)
            }
            GameOutcome::InProgress => format!("AI turn ({})", self.ai),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_human_x_moves_first() {
        let game = AiMatch::start(Player::X, Difficulty::Easy);
        assert!(game.accepts_input());
        assert!(!game.ai_thinking());
        assert_eq!(game.status(), "Your turn (X)");
    }

    #[test]
    fn test_ai_opens_when_human_is_o() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = AiMatch::start(Player::O, Difficulty::Impossible);
        assert!(game.ai_thinking());
        assert_eq!(game.status(), "AI (impossible) is thinking...");
        assert!(!game.human_move(0));

        let pos = game.ai_move(&mut rng).unwrap();
        assert_eq!(pos, Some(Position::Center));
        assert_eq!(game.status(), "Your turn (O)");
    }

    #[test]
    fn test_hand_off_and_reply() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut game = AiMatch::start(Player::X, Difficulty::Impossible);
        assert!(game.human_move(0));
        assert!(game.ai_thinking());
        assert!(!game.human_move(1), "input locked while the AI thinks");

        assert_eq!(game.ai_move(&mut rng).unwrap(), Some(Position::Center));
        assert!(game.accepts_input());
    }

    #[test]
    fn test_ai_move_off_turn_is_none() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut game = AiMatch::start(Player::X, Difficulty::Medium);
        assert_eq!(game.ai_move(&mut rng).unwrap(), None);
        assert!(game.state().board().empty_positions().len() == 9);
    }

    #[test]
    fn test_retry_keeps_settings() {
        let mut game = AiMatch::start(Player::X, Difficulty::Medium);
        game.human_move(4);
        let fresh = game.retry();
        assert_eq!(fresh.human(), Player::X);
        assert_eq!(fresh.difficulty(), Difficulty::Medium);
        assert_eq!(fresh.state(), &GameState::new());
    }
}
