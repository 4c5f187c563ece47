//! Leaderboard - top scores per level and their text encoding
//!
//! Each level keeps at most [`LEADERBOARD_CAPACITY`] records ordered by score
//! (descending) then time taken (ascending). Full ties keep insertion order.
//!
//! # File format
//!
//! One record per line:
//!
//! ```text
//! level,score,timeTakenSeconds,moves,playerName
//! ```
//!
//! There is no escaping. A player name containing a comma produces a line with
//! too many fields, which is skipped on the next load.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use crate::types::{LEADERBOARD_CAPACITY, LEVEL_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreRecord {
    pub score: u32,
    pub time_taken_secs: u32,
    pub moves: u32,
    pub player_name: String,
}

impl ScoreRecord {
    pub fn new(
        score: u32,
        time_taken_secs: u32,
        moves: u32,
        player_name: impl Into<String>,
    ) -> Self {
        Self {
            score,
            time_taken_secs,
            moves,
            player_name: player_name.into(),
        }
    }

    /// Leaderboard order: higher score first, then faster time.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.time_taken_secs.cmp(&other.time_taken_secs))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("failed to read leaderboard: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write leaderboard: {0}")]
    Write(#[source] io::Error),
}

/// Why a leaderboard line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("expected 5 comma-separated fields, found {0}")]
    FieldCount(usize),

    #[error("{field} is not an unsigned integer: {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("unknown level {0}")]
    UnknownLevel(u8),

    #[error("line is not valid UTF-8")]
    NotUtf8,
}

fn level_known(level: u8) -> bool {
    (1..=LEVEL_COUNT).contains(&level)
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, LineError> {
    raw.trim().parse().map_err(|_| LineError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

/// Decode one line into `(level, record)`.
///
/// # Examples
///
/// ```
/// use neuro_quest_core::leaderboard::{parse_line, ScoreRecord};
///
/// let (level, record) = parse_line("2,850,45,10,Ann").unwrap();
/// assert_eq!(level, 2);
/// assert_eq!(record, ScoreRecord::new(850, 45, 10, "Ann"));
///
/// assert!(parse_line("x,850,45,10,Ann").is_err());
/// ```
pub fn parse_line(line: &str) -> Result<(u8, ScoreRecord), LineError> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    let [level, score, time, moves, name] = fields.as_slice() else {
        return Err(LineError::FieldCount(fields.len()));
    };

    let level: u8 = parse_field("level", level)?;
    if !level_known(level) {
        return Err(LineError::UnknownLevel(level));
    }

    let record = ScoreRecord {
        score: parse_field("score", score)?,
        time_taken_secs: parse_field("time", time)?,
        moves: parse_field("moves", moves)?,
        player_name: name.to_string(),
    };
    Ok((level, record))
}

fn encode_line(level: u8, record: &ScoreRecord) -> String {
    format!(
        "{},{},{},{},{}\n",
        level, record.score, record.time_taken_secs, record.moves, record.player_name
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    levels: BTreeMap<u8, Vec<ScoreRecord>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record and keep the level's top five.
    ///
    /// Returns the record's 0-based rank if it made the cut.
    pub fn submit(&mut self, level: u8, record: ScoreRecord) -> Option<usize> {
        if !level_known(level) {
            tracing::warn!(level, "ignoring score for unknown level");
            return None;
        }
        let records = self.levels.entry(level).or_default();

        // Stable insert: after every record that ranks the same or better.
        let rank = records
            .iter()
            .position(|r| r.rank_cmp(&record) == Ordering::Greater)
            .unwrap_or(records.len());
        records.insert(rank, record);
        records.truncate(LEADERBOARD_CAPACITY);

        (rank < LEADERBOARD_CAPACITY).then_some(rank)
    }

    pub fn top_of(&self, level: u8) -> &[ScoreRecord] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn best_of(&self, level: u8) -> Option<&ScoreRecord> {
        self.top_of(level).first()
    }

    pub fn len(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode the text encoding, skipping malformed lines.
    pub fn parse(text: &str) -> Self {
        let mut board = Self::new();
        for (idx, line) in text.lines().enumerate() {
            board.ingest_line(idx + 1, line);
        }
        board.rank_all();
        board
    }

    /// Read and decode from `reader`. Only I/O failures are errors; a line
    /// that is not UTF-8 is skipped like any other malformed line.
    pub fn load<R: BufRead>(mut reader: R) -> Result<Self, LeaderboardError> {
        let mut board = Self::new();
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(LeaderboardError::Read)?;
            if read == 0 {
                break;
            }
            line_no += 1;
            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            match std::str::from_utf8(raw) {
                Ok(line) => board.ingest_line(line_no, line),
                Err(_) => {
                    tracing::warn!(
                        line_no,
                        err = %LineError::NotUtf8,
                        "skipping malformed leaderboard entry"
                    );
                }
            }
        }
        board.rank_all();
        Ok(board)
    }

    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (&level, records) in &self.levels {
            for record in records {
                out.push_str(&encode_line(level, record));
            }
        }
        out
    }

    pub fn save<W: Write>(&self, mut writer: W) -> Result<(), LeaderboardError> {
        writer
            .write_all(self.encode().as_bytes())
            .map_err(LeaderboardError::Write)?;
        writer.flush().map_err(LeaderboardError::Write)
    }

    fn ingest_line(&mut self, line_no: usize, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match parse_line(line) {
            Ok((level, record)) => self.levels.entry(level).or_default().push(record),
            Err(err) => {
                tracing::warn!(line_no, line, %err, "skipping malformed leaderboard entry");
            }
        }
    }

    fn rank_all(&mut self) {
        for records in self.levels.values_mut() {
            records.sort_by(ScoreRecord::rank_cmp);
            records.truncate(LEADERBOARD_CAPACITY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(score: u32, time: u32, name: &str) -> ScoreRecord {
        ScoreRecord::new(score, time, 10, name)
    }

    #[test]
    fn submit_sorts_by_score_then_time() {
        let mut board = Leaderboard::new();
        assert_eq!(board.submit(1, rec(500, 30, "a")), Some(0));
        assert_eq!(board.submit(1, rec(900, 30, "b")), Some(0));
        assert_eq!(board.submit(1, rec(500, 20, "c")), Some(1));
        let names: Vec<_> = board.top_of(1).iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn submit_caps_at_five() {
        let mut board = Leaderboard::new();
        for i in 0..8 {
            board.submit(2, rec(100 * i, 10, "p"));
        }
        let scores: Vec<_> = board.top_of(2).iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![700, 600, 500, 400, 300]);
        assert_eq!(board.submit(2, rec(50, 10, "late")), None);
        assert_eq!(board.top_of(2).len(), 5);
    }

    #[test]
    fn full_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.submit(1, rec(700, 20, "first"));
        assert_eq!(board.submit(1, rec(700, 20, "second")), Some(1));
        let names: Vec<_> = board.top_of(1).iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn tie_at_the_cut_is_dropped() {
        let mut board = Leaderboard::new();
        for name in ["a", "b", "c", "d", "e"] {
            board.submit(3, rec(400, 40, name));
        }
        assert_eq!(board.submit(3, rec(400, 40, "f")), None);
        assert!(board.top_of(3).iter().all(|r| r.player_name != "f"));
    }

    #[test]
    fn levels_are_independent() {
        let mut board = Leaderboard::new();
        board.submit(1, rec(100, 1, "x"));
        board.submit(3, rec(200, 1, "y"));
        assert_eq!(board.top_of(1).len(), 1);
        assert!(board.top_of(2).is_empty());
        assert_eq!(board.best_of(3).map(|r| r.score), Some(200));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn unknown_level_rejected() {
        let mut board = Leaderboard::new();
        assert_eq!(board.submit(0, rec(1, 1, "x")), None);
        assert_eq!(board.submit(4, rec(1, 1, "x")), None);
        assert!(board.is_empty());
    }

    #[test]
    fn parse_line_examples() {
        let (level, record) = parse_line("2,850,45,10,Ann").unwrap();
        assert_eq!(level, 2);
        assert_eq!(record, ScoreRecord::new(850, 45, 10, "Ann"));

        assert!(matches!(
            parse_line("x,850,45,10,Ann"),
            Err(LineError::NotANumber { field: "level", .. })
        ));
        assert_eq!(parse_line("1,850,45,Ann"), Err(LineError::FieldCount(4)));
        assert_eq!(parse_line("1,850,45,10,Ann,Lee"), Err(LineError::FieldCount(6)));
        assert_eq!(parse_line("9,850,45,10,Ann"), Err(LineError::UnknownLevel(9)));
        assert!(parse_line("1,-5,45,10,Ann").is_err());
        assert!(parse_line("1,850,4.5,10,Ann").is_err());
    }

    #[test]
    fn parse_skips_bad_lines_and_ranks() {
        let text = "\
1,300,20,8,Bo
x,850,45,10,Ann
1,900,25,6,Cy

2,850,45,10,Ann
1,900,15,6,Di
garbage
";
        let board = Leaderboard::parse(text);
        let names: Vec<_> = board.top_of(1).iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["Di", "Cy", "Bo"]);
        assert_eq!(board.top_of(2), &[ScoreRecord::new(850, 45, 10, "Ann")]);
    }

    #[test]
    fn parse_truncates_overfull_levels() {
        let text: String = (0..9).map(|i| format!("1,{},10,5,p{}\n", i * 10, i)).collect();
        let board = Leaderboard::parse(&text);
        let scores: Vec<_> = board.top_of(1).iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![80, 70, 60, 50, 40]);
    }

    #[test]
    fn save_then_load_reproduces_order() {
        let mut board = Leaderboard::new();
        board.submit(1, rec(800, 12, "Ann"));
        board.submit(1, rec(800, 9, "Bo"));
        board.submit(2, rec(650, 40, "Cy"));
        board.submit(3, rec(1200, 30, "Di Lee"));

        let mut buf = Vec::new();
        board.save(&mut buf).unwrap();
        let loaded = Leaderboard::load(buf.as_slice()).unwrap();
        assert_eq!(loaded, board);
    }

    #[test]
    fn encode_is_level_ordered() {
        let mut board = Leaderboard::new();
        board.submit(3, ScoreRecord::new(1, 2, 3, "c"));
        board.submit(1, ScoreRecord::new(4, 5, 6, "a"));
        assert_eq!(board.encode(), "1,4,5,6,a\n3,1,2,3,c\n");
    }

    #[test]
    fn comma_in_name_is_lost_on_reload() {
        let mut board = Leaderboard::new();
        board.submit(1, rec(500, 10, "Lee, Ann"));
        let reloaded = Leaderboard::parse(&board.encode());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn load_skips_non_utf8_lines() {
        let bytes: &[u8] = b"2,850,45,10,Ann\r\n1,700,20,5,Jos\xe9\n1,900,10,4,Bo";
        let board = Leaderboard::load(bytes).unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board.top_of(2), &[ScoreRecord::new(850, 45, 10, "Ann")]);
        assert_eq!(board.top_of(1), &[ScoreRecord::new(900, 10, 4, "Bo")]);
    }

    #[test]
    fn non_utf8_reads_as_a_line_error() {
        assert_eq!(LineError::NotUtf8.to_string(), "line is not valid UTF-8");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_reported() {
        let mut board = Leaderboard::new();
        board.submit(1, rec(500, 10, "Ann"));
        let err = board.save(FailingWriter).unwrap_err();
        assert!(matches!(err, LeaderboardError::Write(_)));
        assert_eq!(board.len(), 1);
    }
}
