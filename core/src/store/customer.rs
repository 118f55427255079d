use super::{clamp_pct, BoostStore};
use crate::{
    customer::{AccountStatus, ContactPreference, Customer},
    error::EngineResult,
    repository::CustomerRepository,
    types::CustomerId,
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row, Transaction, TransactionBehavior};

const CUSTOMER_COLUMNS: &str =
    "customer_id, device_id, account_status, olt_technology, avg_usage_percentage,
     avg_download_usage_mbps, current_download_mbps, last_upgrade_date,
     last_promo_offer_date, contact_preference, first_name, last_name,
     email, phone, address";

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        customer_id:             row.get(0)?,
        device_id:               row.get(1)?,
        account_status:          AccountStatus::parse(&row.get::<_, String>(2)?),
        olt_technology:          row.get(3)?,
        avg_usage_percentage:    row.get(4)?,
        avg_download_usage_mbps: row.get(5)?,
        current_download_mbps:   row.get(6)?,
        last_upgrade_date:       row.get(7)?,
        last_promo_offer_date:   row.get(8)?,
        contact_preference:      row
            .get::<_, Option<String>>(9)?
            .as_deref()
            .and_then(ContactPreference::parse),
        first_name:              row.get(10)?,
        last_name:               row.get(11)?,
        email:                   row.get(12)?,
        phone:                   row.get(13)?,
        address:                 row.get(14)?,
    })
}

impl BoostStore {
    // ── Customer ingestion ────────────────────────────────────────

    pub fn insert_customer(&self, c: &Customer) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO customer (
                customer_id, device_id, account_status, olt_technology,
                avg_usage_percentage, avg_download_usage_mbps, current_download_mbps,
                last_upgrade_date, last_promo_offer_date, contact_preference,
                first_name, last_name, email, phone, address
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                &c.customer_id,
                &c.device_id,
                c.account_status.as_str(),
                &c.olt_technology,
                clamp_pct(c.avg_usage_percentage),
                c.avg_download_usage_mbps,
                c.current_download_mbps,
                c.last_upgrade_date,
                c.last_promo_offer_date,
                c.contact_preference.map(|p| p.as_str()),
                &c.first_name,
                &c.last_name,
                &c.email,
                &c.phone,
                &c.address,
            ],
        )?;
        Ok(())
    }

    pub fn customer_total(&self) -> EngineResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
        Ok(n)
    }

    fn customer_in_tx(tx: &Transaction<'_>, customer_id: &str) -> rusqlite::Result<Option<Customer>> {
        tx.query_row(
            &format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = ?1"),
            params![customer_id],
            customer_from_row,
        )
        .optional()
    }
}

impl CustomerRepository for BoostStore {
    fn all_customers(&self) -> EngineResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY rowid ASC"))?;
        let rows = stmt
            .query_map([], customer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn customer(&self, customer_id: &str) -> EngineResult<Option<Customer>> {
        let c = self
            .conn
            .query_row(
                &format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = ?1"),
                params![customer_id],
                customer_from_row,
            )
            .optional()?;
        Ok(c)
    }

    fn customers_on_device(&self, device_id: &str) -> EngineResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE device_id = ?1 ORDER BY rowid ASC"
        ))?;
        let rows = stmt
            .query_map(params![device_id], customer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn record_promo_offers(
        &self,
        customer_ids: &[CustomerId],
        offered_on: NaiveDate,
    ) -> EngineResult<Vec<Customer>> {
        // IMMEDIATE takes the write lock up front, so the preference read
        // and the date write see the same rows.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let mut recorded = Vec::with_capacity(customer_ids.len());
        for id in customer_ids {
            let Some(mut c) = Self::customer_in_tx(&tx, id)? else {
                continue;
            };
            tx.execute(
                "UPDATE customer SET last_promo_offer_date = ?1 WHERE customer_id = ?2",
                params![offered_on, id],
            )?;
            c.last_promo_offer_date = Some(offered_on);
            recorded.push(c);
        }
        tx.commit()?;
        Ok(recorded)
    }
}
