//! Game session: turn order and outcome of each command.
//!
//! A [`Game`] is in one of three states. Before the first `00` it is
//! [`State::NoGame`]; `00` moves it to [`State::InProgress`] from anywhere;
//! checkmate or resignation moves it to [`State::GameOver`]. Only `00` and the
//! board view are accepted outside a running game.

use tracing::{debug, info, trace};

use crate::board::{Board, Color};
use crate::protocol::{Command, CommandError, FormatError, MoveSpec, Response, parse_command};
use crate::rules::{MoveRequest, in_check, search_move, validate};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    NoGame,
    InProgress,
    GameOver,
}

/// One game session.
#[derive(Clone, Debug)]
pub struct Game {
    state: State,
    turn: Color,
    player: Color,
    board: Board,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A session with no game started yet.
    pub fn new() -> Self {
        Self {
            state: State::NoGame,
            turn: Color::White,
            player: Color::White,
            board: Board::empty(),
        }
    }

    /// A running game from an arbitrary position.
    pub fn from_position(board: Board, player: Color, turn: Color) -> Self {
        Self {
            state: State::InProgress,
            turn,
            player,
            board,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn player_color(&self) -> Color {
        self.player
    }

    pub fn computer_color(&self) -> Color {
        self.player.opponent()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Decode and run one command line, turning any error into its reply.
    pub fn execute_line(&mut self, line: &str) -> Response {
        match parse_command(line).and_then(|cmd| self.execute(cmd)) {
            Ok(response) => response,
            Err(e) => {
                debug!(%e, line, "command rejected");
                e.response()
            }
        }
    }

    /// Run a decoded command.
    pub fn execute(&mut self, cmd: Command) -> Result<Response, CommandError> {
        match cmd {
            Command::NewGame(color) => Ok(self.new_game(color)),
            Command::ViewBoard => Ok(self.view()),
            Command::Move(spec) => self.player_move(&spec),
            Command::ComputerMove => self.computer_move(),
            Command::Resign => self.resign(),
        }
    }

    /// Reset to the starting position. White always moves first.
    pub fn new_game(&mut self, player: Color) -> Response {
        self.board = Board::new();
        self.turn = Color::White;
        self.player = player;
        self.state = State::InProgress;
        info!(?player, "new game");
        Response::Ok
    }

    pub fn view(&self) -> Response {
        Response::Board(self.board.snapshot())
    }

    /// Play the player's move and report its effect on the engine's king.
    pub fn player_move(&mut self, spec: &MoveSpec) -> Result<Response, CommandError> {
        self.require_turn(self.player)?;

        let computer = self.computer_color();
        let sides_ok = spec.color == self.player
            && spec.capture.is_none_or(|c| c.color == computer)
            && spec.promotion.is_none_or(|p| p.color == self.player);
        if !sides_ok {
            return Err(FormatError::WrongSide.into());
        }

        let req = MoveRequest {
            color: spec.color,
            kind: spec.kind,
            from: spec.from,
            to: spec.to,
            capture: spec.capture.map(|c| c.kind),
            promotion: spec.promotion.map(|p| p.kind),
        };
        validate(&mut self.board, &req)?;
        debug!(%spec, "player moved");

        self.turn = computer;
        Ok(self.assess(computer))
    }

    /// Let the engine play its move and report the effect on the player.
    pub fn computer_move(&mut self) -> Result<Response, CommandError> {
        let computer = self.computer_color();
        self.require_turn(computer)?;

        match search_move(&mut self.board, computer, true) {
            Some(ply) => trace!(from = %ply.from, to = %ply.to, index = ply.index, "engine moved"),
            None => debug!("engine has no legal move"),
        }

        self.turn = self.player;
        Ok(self.assess(self.player))
    }

    pub fn resign(&mut self) -> Result<Response, CommandError> {
        self.require_turn(self.player)?;
        self.state = State::GameOver;
        info!("player resigned");
        Ok(Response::Ok)
    }

    fn require_turn(&self, color: Color) -> Result<(), CommandError> {
        if self.state != State::InProgress {
            return Err(CommandError::NoGame);
        }
        if self.turn != color {
            return Err(CommandError::OutOfTurn);
        }
        Ok(())
    }

    /// Outcome for the side about to move: ok, check, or mate (ending the game).
    fn assess(&mut self, defender: Color) -> Response {
        if !in_check(&self.board, defender) {
            return Response::Ok;
        }
        if search_move(&mut self.board, defender, false).is_some() {
            Response::Check
        } else {
            info!(?defender, "checkmate");
            self.state = State::GameOver;
            Response::Mate
        }
    }
}
