//! Narrow traits the core calls to reach the outside world: one trait per
//! concern (I/O, clock, randomness, foreign-code execution) rather than
//! one grab-bag "host" object, so an embedder can swap in exactly the
//! access it wants to grant.

use crate::error::Result;

/// Byte/text I/O: stdin/stdout plus file and URL reads.
pub trait IoCapability {
    fn read_line(&mut self) -> Result<Option<String>>;
    fn read_char(&mut self) -> Result<Option<char>>;
    fn write_str(&mut self, s: &str) -> Result<()>;
    fn read_file(&mut self, path: &str, encoding: &str) -> Result<String>;
    fn write_file(&mut self, path: &str, contents: &str, encoding: &str) -> Result<()>;
    fn read_url(&mut self, url: &str) -> Result<String>;
    fn run_shell(&mut self, command: &str) -> Result<(i32, String)>;
}

/// Wall-clock and monotonic time.
pub trait ClockCapability {
    /// Seconds since the Unix epoch.
    fn now_unix(&self) -> f64;
    /// A monotonically increasing counter in seconds, for timing.
    fn monotonic(&self) -> f64;
    fn sleep(&mut self, seconds: f64) -> Result<()>;
}

/// A seedable random-number generator.
pub trait RandomCapability {
    fn seed(&mut self, seed: u64);
    /// A uniform `f64` in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
    /// A uniform `i64` in `[low, high)`.
    fn next_range(&mut self, low: i64, high: i64) -> i64;
}

/// The foreign-code escape hatch: `exec(code, globals_id, locals_id,
/// stack_mirror)`. Out of core scope to implement a foreign runtime; the
/// core only needs somewhere to route the call.
pub trait ForeignCapability {
    fn exec(&mut self, code: &str, globals_id: u64, locals_id: u64, stack_mirror: &str) -> Result<String>;
}

/// The aggregate bundle a `Runner` holds: one boxed trait object per
/// capability concern.
pub struct Capabilities {
    pub io: Box<dyn IoCapability>,
    pub clock: Box<dyn ClockCapability>,
    pub random: Box<dyn RandomCapability>,
    pub foreign: Box<dyn ForeignCapability>,
}

/// Every call fails with `Error::Io`. Useful for embedding contexts that
/// want a hard sandbox, and as the default for unit tests that never touch
/// a capability.
pub struct NullCapabilities;

impl IoCapability for NullCapabilities {
    fn read_line(&mut self) -> Result<Option<String>> {
        Err(denied("read_line"))
    }
    fn read_char(&mut self) -> Result<Option<char>> {
        Err(denied("read_char"))
    }
    fn write_str(&mut self, _s: &str) -> Result<()> {
        Err(denied("write_str"))
    }
    fn read_file(&mut self, _path: &str, _encoding: &str) -> Result<String> {
        Err(denied("read_file"))
    }
    fn write_file(&mut self, _path: &str, _contents: &str, _encoding: &str) -> Result<()> {
        Err(denied("write_file"))
    }
    fn read_url(&mut self, _url: &str) -> Result<String> {
        Err(denied("read_url"))
    }
    fn run_shell(&mut self, _command: &str) -> Result<(i32, String)> {
        Err(denied("run_shell"))
    }
}

impl ClockCapability for NullCapabilities {
    fn now_unix(&self) -> f64 {
        0.0
    }
    fn monotonic(&self) -> f64 {
        0.0
    }
    fn sleep(&mut self, _seconds: f64) -> Result<()> {
        Err(denied("sleep"))
    }
}

impl RandomCapability for NullCapabilities {
    fn seed(&mut self, _seed: u64) {}
    fn next_f64(&mut self) -> f64 {
        0.0
    }
    fn next_range(&mut self, low: i64, _high: i64) -> i64 {
        low
    }
}

impl ForeignCapability for NullCapabilities {
    fn exec(&mut self, _code: &str, _globals_id: u64, _locals_id: u64, _stack_mirror: &str) -> Result<String> {
        Err(denied("exec"))
    }
}

fn denied(what: &str) -> crate::error::Error {
    crate::error::Error::Io {
        message: format!("capability `{what}` is not available"),
    }
}

/// Real stdio, real wall-clock/monotonic time, and a seedable PRNG. The CLI
/// crate wires this in; the foreign-code capability still errors, since no
/// foreign-language runtime is embedded.
pub struct StdCapabilities {
    rng: rand_chacha::ChaCha8Rng,
    start: std::time::Instant,
}

impl Default for StdCapabilities {
    fn default() -> Self {
        use rand::SeedableRng;
        StdCapabilities {
            rng: rand_chacha::ChaCha8Rng::from_entropy(),
            start: std::time::Instant::now(),
        }
    }
}

impl IoCapability for StdCapabilities {
    fn read_line(&mut self) -> Result<Option<String>> {
        use std::io::BufRead;
        let mut line = String::new();
        let n = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| crate::error::Error::Io { message: e.to_string() })?;
        if n == 0 {
            Ok(None)
        } else {
            if line.ends_with('\n') {
                line.pop();
            }
            Ok(Some(line))
        }
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        use std::io::Read;
        let mut buf = [0u8; 1];
        let n = std::io::stdin()
            .lock()
            .read(&mut buf)
            .map_err(|e| crate::error::Error::Io { message: e.to_string() })?;
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(buf[0] as char))
        }
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        use std::io::Write;
        print!("{s}");
        std::io::stdout()
            .flush()
            .map_err(|e| crate::error::Error::Io { message: e.to_string() })
    }

    fn read_file(&mut self, path: &str, _encoding: &str) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| crate::error::Error::Io { message: e.to_string() })
    }

    fn write_file(&mut self, path: &str, contents: &str, _encoding: &str) -> Result<()> {
        std::fs::write(path, contents).map_err(|e| crate::error::Error::Io { message: e.to_string() })
    }

    fn read_url(&mut self, url: &str) -> Result<String> {
        Err(crate::error::Error::Io {
            message: format!("network access to `{url}` is not available"),
        })
    }

    fn run_shell(&mut self, command: &str) -> Result<(i32, String)> {
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| crate::error::Error::Io { message: e.to_string() })?;
        let code = output.status.code().unwrap_or(-1);
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok((code, text))
    }
}

impl ClockCapability for StdCapabilities {
    fn now_unix(&self) -> f64 {
        chrono::Utc::now().timestamp_millis() as f64 / 1000.0
    }

    fn monotonic(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn sleep(&mut self, seconds: f64) -> Result<()> {
        if seconds > 0.0 {
            std::thread::sleep(std::time::Duration::from_secs_f64(seconds));
        }
        Ok(())
    }
}

impl RandomCapability for StdCapabilities {
    fn seed(&mut self, seed: u64) {
        use rand::SeedableRng;
        self.rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    }

    fn next_f64(&mut self) -> f64 {
        use rand::Rng;
        self.rng.gen::<f64>()
    }

    fn next_range(&mut self, low: i64, high: i64) -> i64 {
        use rand::Rng;
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

impl ForeignCapability for StdCapabilities {
    fn exec(&mut self, _code: &str, _globals_id: u64, _locals_id: u64, _stack_mirror: &str) -> Result<String> {
        Err(crate::error::Error::Io {
            message: "foreign-code execution is not available in this build".to_string(),
        })
    }
}

/// A thin handle sharing one `StdCapabilities` (its PRNG state in
/// particular) across all four trait-object slots of a `Capabilities`
/// bundle, the way `Scope`'s `Rc<RefCell<_>>` is shared across Contexts.
struct StdHandle(std::rc::Rc<std::cell::RefCell<StdCapabilities>>);

impl IoCapability for StdHandle {
    fn read_line(&mut self) -> Result<Option<String>> {
        self.0.borrow_mut().read_line()
    }
    fn read_char(&mut self) -> Result<Option<char>> {
        self.0.borrow_mut().read_char()
    }
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.0.borrow_mut().write_str(s)
    }
    fn read_file(&mut self, path: &str, encoding: &str) -> Result<String> {
        self.0.borrow_mut().read_file(path, encoding)
    }
    fn write_file(&mut self, path: &str, contents: &str, encoding: &str) -> Result<()> {
        self.0.borrow_mut().write_file(path, contents, encoding)
    }
    fn read_url(&mut self, url: &str) -> Result<String> {
        self.0.borrow_mut().read_url(url)
    }
    fn run_shell(&mut self, command: &str) -> Result<(i32, String)> {
        self.0.borrow_mut().run_shell(command)
    }
}

impl ClockCapability for StdHandle {
    fn now_unix(&self) -> f64 {
        self.0.borrow().now_unix()
    }
    fn monotonic(&self) -> f64 {
        self.0.borrow().monotonic()
    }
    fn sleep(&mut self, seconds: f64) -> Result<()> {
        self.0.borrow_mut().sleep(seconds)
    }
}

impl RandomCapability for StdHandle {
    fn seed(&mut self, seed: u64) {
        self.0.borrow_mut().seed(seed)
    }
    fn next_f64(&mut self) -> f64 {
        self.0.borrow_mut().next_f64()
    }
    fn next_range(&mut self, low: i64, high: i64) -> i64 {
        self.0.borrow_mut().next_range(low, high)
    }
}

impl ForeignCapability for StdHandle {
    fn exec(&mut self, code: &str, globals_id: u64, locals_id: u64, stack_mirror: &str) -> Result<String> {
        self.0.borrow_mut().exec(code, globals_id, locals_id, stack_mirror)
    }
}

impl Capabilities {
    /// Real stdio, wall-clock time, and a seedable PRNG, all four slots
    /// sharing one underlying `StdCapabilities` instance. What the `bs`
    /// binary wires in by default.
    pub fn std() -> Self {
        let shared = std::rc::Rc::new(std::cell::RefCell::new(StdCapabilities::default()));
        Capabilities {
            io: Box::new(StdHandle(shared.clone())),
            clock: Box::new(StdHandle(shared.clone())),
            random: Box::new(StdHandle(shared.clone())),
            foreign: Box::new(StdHandle(shared)),
        }
    }

    /// Every capability denies (`Error::Io`). For a hard sandbox or tests
    /// that never touch the outside world.
    pub fn null() -> Self {
        Capabilities {
            io: Box::new(NullCapabilities),
            clock: Box::new(NullCapabilities),
            random: Box::new(NullCapabilities),
            foreign: Box::new(NullCapabilities),
        }
    }
}
