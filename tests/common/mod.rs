#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use robotiq_urcap::{GripperConfig, RobotiqGripper};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

/// Every command line the fake server received, newline stripped.
pub type Log = Arc<Mutex<Vec<String>>>;

/// A scripted stand-in for the URCap socket server.
///
/// `GET` answers from a register map and `SET` stores into it and answers `ack`.
/// Unless passive, writes also act like an idealised gripper: clearing `ACT`
/// resets at once, setting it activates at once, and `GTO = 1` lands on the
/// requested position. Queued replies take precedence over all of this.
pub struct FakeUrcap {
    registers: HashMap<String, i64>,
    replies: HashMap<String, VecDeque<String>>,
    passive: bool,
    log: Log,
}

impl FakeUrcap {
    pub fn new() -> Self {
        Self {
            registers: HashMap::new(),
            replies: HashMap::new(),
            passive: false,
            log: Arc::default(),
        }
    }

    pub fn register(mut self, name: &str, value: i64) -> Self {
        self.registers.insert(name.to_string(), value);
        self
    }

    /// Acknowledge writes without changing any register.
    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// Queue raw replies for a command key such as `GET POS` or `SET POS`.
    pub fn script<I, T>(mut self, key: &str, replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.replies
            .entry(key.to_string())
            .or_default()
            .extend(replies.into_iter().map(|r| r.to_string()));
        self
    }

    /// Queue well-formed `GET name` replies carrying `values`.
    pub fn script_values(self, name: &str, values: &[i64]) -> Self {
        let key = format!("GET {name}");
        let replies: Vec<String> = values.iter().map(|v| format!("{name} {v}")).collect();
        self.script(&key, replies)
    }

    /// Start serving and return a gripper attached to the server.
    pub fn spawn(self) -> (RobotiqGripper<DuplexStream>, Log) {
        self.spawn_with(GripperConfig::new("fake-urcap"))
    }

    pub fn spawn_with(self, config: GripperConfig) -> (RobotiqGripper<DuplexStream>, Log) {
        let (client, server) = tokio::io::duplex(4096);
        let log = self.log.clone();
        tokio::spawn(self.serve(server));
        let gripper = RobotiqGripper::with_stream(config, client).expect("valid config");
        (gripper, log)
    }

    async fn serve(mut self, server: DuplexStream) {
        let (read, mut write) = tokio::io::split(server);
        let mut lines = BufReader::new(read).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            self.log.lock().unwrap().push(line.clone());
            let reply = self.respond(&line);
            if write.write_all(format!("{reply}\n").as_bytes()).await.is_err() {
                break;
            }
        }
    }

    fn respond(&mut self, line: &str) -> String {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default().to_string();

        let key = format!("{verb} {name}");
        if let Some(reply) = self.replies.get_mut(&key).and_then(VecDeque::pop_front) {
            return reply;
        }

        match verb {
            "GET" => format!("{name} {}", self.value(&name)),
            "SET" => {
                let value = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0);
                if !self.passive {
                    self.apply(&name, value);
                }
                "ack".to_string()
            }
            _ => "?".to_string(),
        }
    }

    fn value(&self, name: &str) -> i64 {
        self.registers.get(name).copied().unwrap_or(0)
    }

    fn apply(&mut self, name: &str, value: i64) {
        self.registers.insert(name.to_string(), value);
        match (name, value) {
            ("ACT", 0) => {
                self.registers.insert("STA".into(), 0);
            }
            ("ACT", 1) => {
                self.registers.insert("STA".into(), 3);
            }
            ("GTO", 1) => {
                let target = self.value("POS");
                self.registers.insert("PRE".into(), target);
                self.registers.insert("OBJ".into(), 3);
            }
            _ => {}
        }
    }
}

/// Snapshot of the commands received so far.
pub fn sent(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// How many received commands equal `command`.
pub fn count(log: &Log, command: &str) -> usize {
    log.lock().unwrap().iter().filter(|c| *c == command).count()
}
