//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use simledger_core::{
  Error as CoreError,
  cost::{CostPeriod, NewCostEntry},
  invoice::{InvoicePatch, InvoiceStatus, NewInvoice},
  project::{Branch, NewProject, ProjectPatch},
  sim::{Attachments, Location, NewSimCard, Provider, ServiceType, SimCardPatch},
  store::SimStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_sim(number: &str, monthly_cost: f64) -> NewSimCard {
  NewSimCard {
    number:       number.into(),
    service_type: ServiceType::Data,
    provider:     Provider::Stc,
    notes:        None,
    project_id:   None,
    location:     None,
    attachments:  Attachments::default(),
    monthly_cost,
  }
}

fn new_project(name: &str, branch: Branch) -> NewProject {
  NewProject {
    name:        name.into(),
    description: None,
    branch,
    start_date:  NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    end_date:    None,
    location:    None,
  }
}

fn new_invoice(project_id: i64, number: &str) -> NewInvoice {
  NewInvoice {
    project_id,
    invoice_number: number.into(),
    issue_date:     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    total_amount:   1200.0,
    status:         InvoiceStatus::Draft,
  }
}

fn core_err(err: Error) -> CoreError { err.into() }

// ─── SIM cards ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_sim() {
  let s = store().await;

  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();
  assert_eq!(sim.number, "0500000001");
  assert_eq!(sim.provider, Provider::Stc);

  let fetched = s.get_sim(sim.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, sim.id);
  assert_eq!(fetched.number, sim.number);
  assert_eq!(fetched.service_type, ServiceType::Data);
}

#[tokio::test]
async fn get_sim_missing_returns_none() {
  let s = store().await;
  assert!(s.get_sim(999).await.unwrap().is_none());
}

#[tokio::test]
async fn add_sim_records_current_period_cost() {
  let s = store().await;

  let sim = s.add_sim(new_sim("0500000001", 100.0)).await.unwrap();

  let entry = s
    .cost_for_period(sim.id, CostPeriod::current())
    .await
    .unwrap()
    .expect("cost entry for current period");
  assert_eq!(entry.sim_id, sim.id);
  assert_eq!(entry.amount, 100.0);

  let all = s.costs_for_sim(sim.id).await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn add_sim_with_zero_cost_records_no_entry() {
  let s = store().await;

  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();
  assert!(s.costs_for_sim(sim.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_number_rejected_and_store_unchanged() {
  let s = store().await;

  s.add_sim(new_sim("0500000000", 100.0)).await.unwrap();
  let err = s.add_sim(new_sim("0500000000", 75.0)).await.unwrap_err();
  assert!(matches!(
    core_err(err),
    CoreError::DuplicateNumber(n) if n == "0500000000"
  ));

  // Exactly one SIM and one cost entry — the failed add left nothing behind.
  let sims = s.list_sims().await.unwrap();
  assert_eq!(sims.len(), 1);
  assert_eq!(s.costs_for_sim(sims[0].id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_sim_negative_cost_rejected() {
  let s = store().await;
  let err = s.add_sim(new_sim("0500000001", -10.0)).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::NegativeAmount(_)));
  assert!(s.list_sims().await.unwrap().is_empty());
}

#[tokio::test]
async fn sim_location_and_attachments_roundtrip() {
  let s = store().await;

  let mut input = new_sim("0500000001", 0.0);
  input.service_type = ServiceType::VsatInternet;
  input.location = Some(Location {
    lat:     24.7136,
    lng:     46.6753,
    address: "Riyadh, Saudi Arabia".into(),
  });
  input.attachments = Attachments {
    dwg: Some("data:application/acad;base64,QUJD".into()),
    kmz: None,
  };
  input.notes = Some("tower uplink".into());

  let sim = s.add_sim(input).await.unwrap();
  let fetched = s.get_sim(sim.id).await.unwrap().unwrap();

  let loc = fetched.location.expect("location persisted");
  assert_eq!(loc.lat, 24.7136);
  assert_eq!(loc.address, "Riyadh, Saudi Arabia");
  assert_eq!(
    fetched.attachments.dwg.as_deref(),
    Some("data:application/acad;base64,QUJD")
  );
  assert!(fetched.attachments.kmz.is_none());
  assert_eq!(fetched.notes.as_deref(), Some("tower uplink"));
}

#[tokio::test]
async fn update_sim_merges_fields_and_refreshes_timestamp() {
  let s = store().await;
  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();

  let updated = s
    .update_sim(
      sim.id,
      SimCardPatch {
        provider: Some(Provider::Zain),
        notes: Some("migrated".into()),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  assert_eq!(updated.provider, Provider::Zain);
  assert_eq!(updated.notes.as_deref(), Some("migrated"));
  // Untouched fields survive the merge.
  assert_eq!(updated.number, "0500000001");
  assert!(updated.updated_at >= updated.created_at);

  let fetched = s.get_sim(sim.id).await.unwrap().unwrap();
  assert_eq!(fetched.provider, Provider::Zain);
}

#[tokio::test]
async fn update_missing_sim_errors() {
  let s = store().await;
  let err = s
    .update_sim(42, SimCardPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::SimNotFound(42)));
}

#[tokio::test]
async fn delete_sim_is_idempotent_and_removes_costs() {
  let s = store().await;
  let sim = s.add_sim(new_sim("0500000001", 100.0)).await.unwrap();

  s.delete_sim(sim.id).await.unwrap();
  assert!(s.get_sim(sim.id).await.unwrap().is_none());
  assert!(s.list_sims().await.unwrap().is_empty());
  assert!(
    s.cost_for_period(sim.id, CostPeriod::current())
      .await
      .unwrap()
      .is_none()
  );

  // Second delete is a no-op, never a crash.
  s.delete_sim(sim.id).await.unwrap();
}

// ─── Cost entries ────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_cost_and_composite_lookup() {
  let s = store().await;
  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();

  let period = CostPeriod::new(3, 2025).unwrap();
  let entry = s
    .record_cost(NewCostEntry { sim_id: sim.id, amount: 85.5, period })
    .await
    .unwrap();
  assert_eq!(entry.period, period);

  let found = s.cost_for_period(sim.id, period).await.unwrap().unwrap();
  assert_eq!(found.id, entry.id);
  assert_eq!(found.amount, 85.5);

  // A different period has no entry.
  let other = CostPeriod::new(4, 2025).unwrap();
  assert!(s.cost_for_period(sim.id, other).await.unwrap().is_none());
}

#[tokio::test]
async fn record_cost_duplicate_period_rejected() {
  let s = store().await;
  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();

  let period = CostPeriod::new(3, 2025).unwrap();
  s.record_cost(NewCostEntry { sim_id: sim.id, amount: 85.5, period })
    .await
    .unwrap();

  let err = s
    .record_cost(NewCostEntry { sim_id: sim.id, amount: 90.0, period })
    .await
    .unwrap_err();
  assert!(matches!(
    core_err(err),
    CoreError::DuplicateCostPeriod { sim_id, period: p }
      if sim_id == sim.id && p == period
  ));

  // The first entry is untouched.
  let entries = s.costs_for_sim(sim.id).await.unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].amount, 85.5);
}

#[tokio::test]
async fn record_cost_for_missing_sim_errors() {
  let s = store().await;
  let err = s
    .record_cost(NewCostEntry {
      sim_id: 42,
      amount: 10.0,
      period: CostPeriod::new(1, 2025).unwrap(),
    })
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::SimNotFound(42)));
}

#[tokio::test]
async fn record_cost_validates_month_and_amount() {
  let s = store().await;
  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();

  let err = s
    .record_cost(NewCostEntry {
      sim_id: sim.id,
      amount: 10.0,
      period: CostPeriod { month: 13, year: 2025 },
    })
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::InvalidMonth(13)));

  let err = s
    .record_cost(NewCostEntry {
      sim_id: sim.id,
      amount: -1.0,
      period: CostPeriod::new(1, 2025).unwrap(),
    })
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::NegativeAmount(_)));
}

#[tokio::test]
async fn costs_for_sim_ordered_by_period() {
  let s = store().await;
  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();

  for (month, year, amount) in [(12, 2024, 80.0), (2, 2025, 90.0), (1, 2025, 85.0)] {
    s.record_cost(NewCostEntry {
      sim_id: sim.id,
      amount,
      period: CostPeriod::new(month, year).unwrap(),
    })
    .await
    .unwrap();
  }

  let entries = s.costs_for_sim(sim.id).await.unwrap();
  let periods: Vec<(u32, i32)> =
    entries.iter().map(|e| (e.period.month, e.period.year)).collect();
  assert_eq!(periods, [(12, 2024), (1, 2025), (2, 2025)]);
}

#[tokio::test]
async fn list_sims_with_cost_defaults_missing_entries_to_zero() {
  let s = store().await;

  let with_cost = s.add_sim(new_sim("0500000001", 100.0)).await.unwrap();
  let without = s.add_sim(new_sim("0500000002", 0.0)).await.unwrap();

  let snapshot = s
    .list_sims_with_cost(CostPeriod::current())
    .await
    .unwrap();
  assert_eq!(snapshot.len(), 2);

  let find = |id| snapshot.iter().find(|s| s.sim.id == id).unwrap();
  assert_eq!(find(with_cost.id).monthly_cost, 100.0);
  assert_eq!(find(without.id).monthly_cost, 0.0);
}

#[tokio::test]
async fn list_sims_with_cost_is_period_specific() {
  let s = store().await;
  let sim = s.add_sim(new_sim("0500000001", 0.0)).await.unwrap();

  let march = CostPeriod::new(3, 2025).unwrap();
  s.record_cost(NewCostEntry { sim_id: sim.id, amount: 60.0, period: march })
    .await
    .unwrap();

  let in_march = s.list_sims_with_cost(march).await.unwrap();
  assert_eq!(in_march[0].monthly_cost, 60.0);

  let in_april = s
    .list_sims_with_cost(CostPeriod::new(4, 2025).unwrap())
    .await
    .unwrap();
  assert_eq!(in_april[0].monthly_cost, 0.0);
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_get_and_list_projects() {
  let s = store().await;

  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();
  assert_eq!(p.branch, Branch::Main);

  let fetched = s.get_project(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Fiber Rollout");

  s.add_project(new_project("Desert Link", Branch::Tabuk))
    .await
    .unwrap();
  assert_eq!(s.list_projects().await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_project_merges_fields() {
  let s = store().await;
  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();

  let updated = s
    .update_project(
      p.id,
      ProjectPatch {
        branch: Some(Branch::Jeddah),
        end_date: NaiveDate::from_ymd_opt(2025, 12, 31),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  assert_eq!(updated.branch, Branch::Jeddah);
  assert_eq!(updated.end_date, NaiveDate::from_ymd_opt(2025, 12, 31));
  assert_eq!(updated.name, "Fiber Rollout");

  let err = s
    .update_project(999, ProjectPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::ProjectNotFound(999)));
}

#[tokio::test]
async fn sims_by_project_filters_assignment() {
  let s = store().await;
  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();

  let mut assigned = new_sim("0500000001", 0.0);
  assigned.project_id = Some(p.id);
  s.add_sim(assigned).await.unwrap();
  s.add_sim(new_sim("0500000002", 0.0)).await.unwrap();

  let sims = s.sims_by_project(p.id).await.unwrap();
  assert_eq!(sims.len(), 1);
  assert_eq!(sims[0].number, "0500000001");
}

#[tokio::test]
async fn delete_project_cascades_invoices() {
  let s = store().await;
  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();
  s.add_invoice(new_invoice(p.id, "INV-1")).await.unwrap();
  s.add_invoice(new_invoice(p.id, "INV-2")).await.unwrap();

  s.delete_project(p.id).await.unwrap();

  assert!(s.get_project(p.id).await.unwrap().is_none());
  assert!(s.invoices_for_project(p.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_project_with_no_invoices_succeeds() {
  let s = store().await;
  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();

  s.delete_project(p.id).await.unwrap();
  assert!(s.get_project(p.id).await.unwrap().is_none());

  // Second delete is a no-op.
  s.delete_project(p.id).await.unwrap();
}

#[tokio::test]
async fn delete_project_clears_sim_assignment() {
  let s = store().await;
  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();

  let mut input = new_sim("0500000001", 0.0);
  input.project_id = Some(p.id);
  let sim = s.add_sim(input).await.unwrap();

  s.delete_project(p.id).await.unwrap();

  // The SIM survives, back in the unassigned pool.
  let fetched = s.get_sim(sim.id).await.unwrap().unwrap();
  assert_eq!(fetched.project_id, None);
}

// ─── Invoices ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_invoice_requires_existing_project() {
  let s = store().await;
  let err = s.add_invoice(new_invoice(42, "INV-1")).await.unwrap_err();
  assert!(matches!(core_err(err), CoreError::ProjectNotFound(42)));
}

#[tokio::test]
async fn invoices_for_project_uses_project_index() {
  let s = store().await;
  let p1 = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();
  let p2 = s
    .add_project(new_project("Desert Link", Branch::Tabuk))
    .await
    .unwrap();

  s.add_invoice(new_invoice(p1.id, "INV-1")).await.unwrap();
  s.add_invoice(new_invoice(p2.id, "INV-2")).await.unwrap();
  s.add_invoice(new_invoice(p1.id, "INV-3")).await.unwrap();

  let for_p1 = s.invoices_for_project(p1.id).await.unwrap();
  assert_eq!(for_p1.len(), 2);
  assert!(for_p1.iter().all(|i| i.project_id == p1.id));
}

#[tokio::test]
async fn update_invoice_status_flow() {
  let s = store().await;
  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();
  let invoice = s.add_invoice(new_invoice(p.id, "INV-1")).await.unwrap();
  assert_eq!(invoice.status, InvoiceStatus::Draft);

  let issued = s
    .update_invoice(
      invoice.id,
      InvoicePatch { status: Some(InvoiceStatus::Issued), ..Default::default() },
    )
    .await
    .unwrap();
  assert_eq!(issued.status, InvoiceStatus::Issued);
  assert_eq!(issued.invoice_number, "INV-1");

  let err = s
    .update_invoice(999, InvoicePatch::default())
    .await
    .unwrap_err();
  assert!(matches!(core_err(err), CoreError::InvoiceNotFound(999)));
}

#[tokio::test]
async fn delete_invoice_is_idempotent() {
  let s = store().await;
  let p = s
    .add_project(new_project("Fiber Rollout", Branch::Main))
    .await
    .unwrap();
  let invoice = s.add_invoice(new_invoice(p.id, "INV-1")).await.unwrap();

  s.delete_invoice(invoice.id).await.unwrap();
  assert!(s.invoices_for_project(p.id).await.unwrap().is_empty());
  s.delete_invoice(invoice.id).await.unwrap();
}

// ─── Roll-up over live store data ────────────────────────────────────────────

#[tokio::test]
async fn rollup_scenario_through_the_store() {
  use simledger_core::rollup;

  let s = store().await;
  let p1 = s
    .add_project(new_project("P1", Branch::Main))
    .await
    .unwrap();

  let mut s1 = new_sim("0500000001", 100.0);
  s1.project_id = Some(p1.id);
  s.add_sim(s1).await.unwrap();
  s.add_sim(new_sim("0500000002", 50.0)).await.unwrap();

  let snapshot = s
    .list_sims_with_cost(CostPeriod::current())
    .await
    .unwrap();

  let rollup_p1 = rollup::project_rollup(p1.id, &snapshot);
  assert_eq!(rollup_p1.monthly_cost, 100.00);
  assert_eq!(rollup_p1.annual_cost, 1200.00);

  let fleet = rollup::fleet_summary(&snapshot);
  assert_eq!(fleet.monthly_total, 150.00);
  assert_eq!(fleet.shares[0].percent, 66.7);
  assert_eq!(fleet.shares[1].percent, 33.3);
}

#[tokio::test]
async fn deleted_sim_leaves_rollup() {
  use simledger_core::rollup;

  let s = store().await;
  let p = s.add_project(new_project("P1", Branch::Main)).await.unwrap();

  let mut input = new_sim("0500000001", 100.0);
  input.project_id = Some(p.id);
  let sim = s.add_sim(input).await.unwrap();

  s.delete_sim(sim.id).await.unwrap();

  let snapshot = s
    .list_sims_with_cost(CostPeriod::current())
    .await
    .unwrap();
  let rollup_p = rollup::project_rollup(p.id, &snapshot);
  assert_eq!(rollup_p.sim_count, 0);
  assert_eq!(rollup_p.monthly_cost, 0.00);
}

// ─── Initialization ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_store_preserves_data() {
  let dir = std::env::temp_dir().join(format!(
    "simledger-test-{}-{}",
    std::process::id(),
    std::time::SystemTime::now()
      .duration_since(std::time::UNIX_EPOCH)
      .unwrap()
      .as_nanos()
  ));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("ledger.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.add_sim(new_sim("0500000001", 100.0)).await.unwrap();
  }

  // Second open runs the idempotent schema again.
  let s = SqliteStore::open(&path).await.unwrap();
  let sims = s.list_sims().await.unwrap();
  assert_eq!(sims.len(), 1);
  assert_eq!(sims[0].number, "0500000001");

  std::fs::remove_dir_all(&dir).ok();
}
