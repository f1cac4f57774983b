use super::{PersistenceResult, PlanStore};
use crate::{Class, Plan, ScheduleEvent};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqlitePlanStore {
    connection: Mutex<Connection>,
}

impl SqlitePlanStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS plan (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS events (
                seq INTEGER PRIMARY KEY,
                event_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS classes (
                class_json TEXT PRIMARY KEY
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_events(&self, tx: &rusqlite::Transaction, plan: &Plan) -> PersistenceResult<()> {
        tx.execute("DELETE FROM events", [])?;
        let mut stmt = tx.prepare("INSERT INTO events (seq, event_json) VALUES (?1, ?2)")?;
        for (seq, event) in plan.events().iter().enumerate() {
            let json = serde_json::to_string(event)?;
            stmt.execute(params![seq as i64, json])?;
        }
        Ok(())
    }

    fn save_classes(&self, tx: &rusqlite::Transaction, plan: &Plan) -> PersistenceResult<()> {
        tx.execute("DELETE FROM classes", [])?;
        let mut stmt = tx.prepare("INSERT INTO classes (class_json) VALUES (?1)")?;
        for class in plan.classes() {
            let json = serde_json::to_string(class)?;
            stmt.execute(params![json])?;
        }
        Ok(())
    }
}

impl PlanStore for SqlitePlanStore {
    fn save_plan(&self, plan: &Plan) -> PersistenceResult<()> {
        super::validate_plan(plan)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM plan", [])?;
        tx.execute("INSERT INTO plan (id, name) VALUES (1, ?1)", params![plan.name()])?;
        self.save_events(&tx, plan)?;
        self.save_classes(&tx, plan)?;
        tx.commit()?;
        Ok(())
    }

    fn load_plan(&self) -> PersistenceResult<Option<Plan>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT name FROM plan WHERE id = 1")?;
        let name: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
        let Some(name) = name else {
            return Ok(None);
        };

        let mut stmt = conn.prepare("SELECT event_json FROM events ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut events = Vec::new();
        for json in rows {
            let event: ScheduleEvent = serde_json::from_str(&json?)?;
            events.push(event);
        }

        let mut stmt = conn.prepare("SELECT class_json FROM classes")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut classes = Vec::new();
        for json in rows {
            let class: Class = serde_json::from_str(&json?)?;
            classes.push(class);
        }

        let plan = Plan::from_parts(name, events, classes);
        super::validate_plan(&plan)?;
        Ok(Some(plan))
    }
}
