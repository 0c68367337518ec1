//! Demo dataset: a handful of worksites, suppliers, requests and payments.
//!
//! The mix is deliberate: some requests fully paid, some partially, one with
//! several payments, one with none at all.

use anyhow::Result;
use sitepay_core::{
  payment::{NewPayment, PaymentMethod},
  request::{NewRequest, Urgency},
  store::ProcurementStore,
  supplier::NewSupplier,
  worksite::NewWorksite,
};
use sitepay_store_sqlite::SqliteStore;

pub async fn populate(store: &SqliteStore) -> Result<()> {
  let worksites = [
    ("Chantier A", "Jean Dupont", "Casablanca"),
    ("Chantier B", "Marie Curie", "Rabat"),
    ("Chantier C", "Ali Ben", "Marrakech"),
    ("Chantier D", "Fatima Zahra", "Tanger"),
    ("Chantier E", "Omar El Idrissi", "Agadir"),
  ];
  let mut worksite_ids = Vec::new();
  for (name, manager, location) in worksites {
    let w = store
      .add_worksite(NewWorksite {
        name:     name.to_owned(),
        manager:  manager.to_owned(),
        location: location.to_owned(),
      })
      .await?;
    worksite_ids.push(w.id);
  }

  let suppliers = [
    ("Fournisseur Alpha", "Matériaux"),
    ("Fournisseur Beta", "Services"),
    ("Fournisseur Gamma", "Location"),
    ("Fournisseur Delta", "Transport"),
    ("Fournisseur Epsilon", "Main d'œuvre"),
  ];
  let mut supplier_ids = Vec::new();
  for (name, category) in suppliers {
    let s = store
      .add_supplier(NewSupplier {
        name:     name.to_owned(),
        category: category.to_owned(),
      })
      .await?;
    supplier_ids.push(s.id);
  }

  // (worksite idx, supplier idx, description, amount, date, urgency, comment)
  let requests = [
    (0, 0, "Ciment", 5000.0, "2024-07-01", Urgency::Urgent, Some("Livraison rapide")),
    (1, 1, "Main d'œuvre", 8000.0, "2024-07-10", Urgency::Normal, None),
    (2, 2, "Gravier", 3000.0, "2024-06-15", Urgency::Urgent, Some("Pour fondations")),
    (3, 3, "Transport", 2000.0, "2024-05-20", Urgency::Normal, Some("Camion 10T")),
    (4, 4, "Peinture", 1500.0, "2024-08-01", Urgency::Urgent, Some("Couleur blanche")),
    (0, 2, "Location grue", 7000.0, "2024-07-15", Urgency::Normal, None),
    (1, 3, "Transport matériaux", 2500.0, "2024-06-25", Urgency::Urgent, Some("Livraison chantier B")),
    (2, 1, "Services nettoyage", 1200.0, "2024-08-10", Urgency::Normal, None),
  ];
  let mut request_ids = Vec::new();
  for (w, s, description, amount, date, urgency, comment) in requests {
    let r = store
      .add_request(NewRequest {
        worksite_id: worksite_ids[w],
        supplier_id: supplier_ids[s],
        description: description.to_owned(),
        amount,
        urgency,
        comment: comment.map(str::to_owned),
        date: date.parse()?,
      })
      .await?;
    request_ids.push(r.id);
  }

  // (request idx, date, amount, method, month label)
  let payments = [
    (0, "2024-07-05", 2000.0, PaymentMethod::Transfer, "Juillet"),
    (0, "2024-07-10", 1000.0, PaymentMethod::Cheque, "Juillet"),
    (1, "2024-07-15", 3000.0, PaymentMethod::Cheque, "Juillet"),
    (2, "2024-06-20", 1500.0, PaymentMethod::Cash, "Juin"),
    (2, "2024-06-25", 1000.0, PaymentMethod::Transfer, "Juin"),
    (3, "2024-05-25", 2000.0, PaymentMethod::Cheque, "Mai"),
    (4, "2024-08-05", 1500.0, PaymentMethod::Cash, "Août"),
    (5, "2024-07-20", 4000.0, PaymentMethod::Transfer, "Juillet"),
    (5, "2024-07-25", 2000.0, PaymentMethod::Cheque, "Juillet"),
    (6, "2024-06-28", 2500.0, PaymentMethod::Cash, "Juin"),
    (7, "2024-08-15", 1200.0, PaymentMethod::Transfer, "Août"),
  ];
  for (r, date, amount, method, month_label) in payments {
    store
      .add_payment(NewPayment {
        request_id: request_ids[r],
        amount,
        date: date.parse()?,
        month_label: month_label.to_owned(),
        method,
      })
      .await?;
  }

  Ok(())
}
