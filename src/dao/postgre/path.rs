use std::{fs, io, path::PathBuf};

pub fn get_path(dir: &str, file: &str) -> PathBuf {
    let mut buf = PathBuf::new();

    for chunk in [dir, "migration", "postgresql", file] {
        buf.push(chunk);
    }

    buf
}

pub fn read_migration(dir: &str, file: &str) -> io::Result<String> {
    fs::read_to_string(get_path(dir, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_path() {
        let path = get_path("/srv/derisk", "loan_state.sql");
        assert_eq!(
            path,
            PathBuf::from("/srv/derisk/migration/postgresql/loan_state.sql")
        );
    }

    #[test]
    fn test_read_migration() {
        let sql = read_migration(env!("CARGO_MANIFEST_DIR"), "notification.sql");
        let sql = sql.unwrap();
        assert!(sql.contains(r#"CREATE TABLE IF NOT EXISTS "notification""#));
    }
}
