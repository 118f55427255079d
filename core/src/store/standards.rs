use super::BoostStore;
use crate::{
    error::EngineResult,
    repository::StandardsSource,
    standards::OversubscriptionStandard,
};
use rusqlite::params;

impl BoostStore {
    pub fn upsert_standard(&self, s: &OversubscriptionStandard) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO oversubscription_standard (lag_type, max_utilization_pct, notes)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (lag_type) DO UPDATE SET
                max_utilization_pct = excluded.max_utilization_pct,
                notes = excluded.notes",
            params![&s.lag_type, s.max_utilization_pct, &s.notes],
        )?;
        Ok(())
    }

    pub fn seed_standards(&self, rows: &[OversubscriptionStandard]) -> EngineResult<()> {
        for s in rows {
            self.upsert_standard(s)?;
        }
        log::info!("store: seeded {} oversubscription standards", rows.len());
        Ok(())
    }
}

impl StandardsSource for BoostStore {
    fn standards(&self) -> EngineResult<Vec<OversubscriptionStandard>> {
        let mut stmt = self.conn.prepare(
            "SELECT lag_type, max_utilization_pct, notes
             FROM oversubscription_standard ORDER BY lag_type ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(OversubscriptionStandard {
                    lag_type:            row.get(0)?,
                    max_utilization_pct: row.get(1)?,
                    notes:               row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
