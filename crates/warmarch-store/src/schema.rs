//! Key-value store database schema.

/// SQL to create the game records table.
pub const CREATE_GAME_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS game_records (
    key        TEXT PRIMARY KEY,
    value      JSONB NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_game_records_key_prefix
    ON game_records (key text_pattern_ops);
";
