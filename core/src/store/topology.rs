use super::{clamp_pct, BoostStore};
use crate::{
    error::EngineResult,
    repository::TopologySource,
    topology::{Edge, LinkStatus},
};
use rusqlite::{params, Row};

fn edge_from_row(row: &Row<'_>) -> rusqlite::Result<Edge> {
    Ok(Edge {
        parent_device_id: row.get(0)?,
        child_device_id:  row.get(1)?,
        link_status:      LinkStatus::parse(&row.get::<_, String>(2)?),
        utilization_pct:  row.get(3)?,
        bandwidth_gbps:   row.get(4)?,
        lag_type:         row.get(5)?,
    })
}

impl BoostStore {
    // ── Topology ingestion ───────────────────────────────────────

    /// Utilization is clamped to [0, 100] and bandwidth to >= 0 here,
    /// at the ingestion boundary. The engine never clamps.
    pub fn insert_edge(&self, e: &Edge) -> EngineResult<()> {
        let bandwidth = if e.bandwidth_gbps.is_nan() { 0.0 } else { e.bandwidth_gbps.max(0.0) };
        self.conn.execute(
            "INSERT INTO topology_edge (
                parent_device_id, child_device_id, link_status,
                utilization_pct, bandwidth_gbps, lag_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &e.parent_device_id,
                &e.child_device_id,
                e.link_status.as_str(),
                clamp_pct(e.utilization_pct),
                bandwidth,
                &e.lag_type,
            ],
        )?;
        Ok(())
    }

    pub fn edge_total(&self) -> EngineResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM topology_edge", [], |row| row.get(0))?;
        Ok(n)
    }
}

impl TopologySource for BoostStore {
    fn all_edges(&self) -> EngineResult<Vec<Edge>> {
        let mut stmt = self.conn.prepare(
            "SELECT parent_device_id, child_device_id, link_status,
                    utilization_pct, bandwidth_gbps, lag_type
             FROM topology_edge ORDER BY id ASC",
        )?;
        let edges = stmt
            .query_map([], edge_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }

    fn edges_touching(&self, device_id: &str) -> EngineResult<Vec<Edge>> {
        let mut stmt = self.conn.prepare(
            "SELECT parent_device_id, child_device_id, link_status,
                    utilization_pct, bandwidth_gbps, lag_type
             FROM topology_edge
             WHERE parent_device_id = ?1 OR child_device_id = ?1
             ORDER BY id ASC",
        )?;
        let edges = stmt
            .query_map(params![device_id], edge_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }
}
