use std::fmt;
use std::str::FromStr;
use std::thread::available_parallelism;
use simple_error::SimpleError;


pub const WINDOW_RADIUS: usize = 2;
pub const COUNT_CHUNK_SIZE: usize = 8192;
pub const RENDER_CHUNK_SIZE: usize = 512;


/// How chunks are scheduled onto threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Bounded pool of scoped workers reporting through a completion queue.
    Pool,
    /// Rayon parallel iterators over the chunk list.
    Rayon,
}

impl FromStr for Strategy {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "pool" {
            Ok(Strategy::Pool)
        } else if s == "rayon" {
            Ok(Strategy::Rayon)
        } else {
            Err(SimpleError::new("Must be pool or rayon"))
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Pool => write!(f, "pool"),
            Strategy::Rayon => write!(f, "rayon"),
        }
    }
}


/// Whether a position's window includes the position itself.
///
/// `Inclusive` counts every token once as its own neighbour, which inflates
/// the diagonal by the token's frequency. It is the default for output
/// compatibility with existing matrices; `Exclusive` gives a symmetric matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowMode {
    Inclusive,
    Exclusive,
}

impl FromStr for WindowMode {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "inclusive" {
            Ok(WindowMode::Inclusive)
        } else if s == "exclusive" {
            Ok(WindowMode::Exclusive)
        } else {
            Err(SimpleError::new("Must be inclusive or exclusive"))
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMode::Inclusive => write!(f, "inclusive"),
            WindowMode::Exclusive => write!(f, "exclusive"),
        }
    }
}


#[derive(Clone, Debug)]
pub struct Settings {
    pub window_radius: usize,
    pub count_chunk_size: usize,
    pub render_chunk_size: usize,
    pub threads: usize,
    pub strategy: Strategy,
    pub window: WindowMode,
}

impl Settings {
    pub fn validate(&self) -> Result<(), SimpleError> {
        if self.count_chunk_size == 0 {
            Err(SimpleError::new("count chunk size must be positive"))
        } else if self.render_chunk_size == 0 {
            Err(SimpleError::new("render chunk size must be positive"))
        } else if self.threads == 0 {
            Err(SimpleError::new("thread count must be positive"))
        } else {
            Ok(())
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            window_radius: WINDOW_RADIUS,
            count_chunk_size: COUNT_CHUNK_SIZE,
            render_chunk_size: RENDER_CHUNK_SIZE,
            threads: available_parallelism().map(|n| n.get()).unwrap_or(1),
            strategy: Strategy::Pool,
            window: WindowMode::Inclusive,
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window_radius: {}, count_chunk_size: {}, render_chunk_size: {}, threads: {}, strategy: {}, window: {}",
            self.window_radius, self.count_chunk_size, self.render_chunk_size, self.threads, self.strategy, self.window)
    }
}
