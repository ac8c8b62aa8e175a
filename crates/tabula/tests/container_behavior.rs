//! Tests for containers used directly and as nested system columns

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tabula::prelude::*;
use tabula::{Entry, NULL_MARKER};

fn orders() -> Container {
    let mut orders = Container::new();
    orders.add_text_column("sku", Some("A-100")).unwrap();
    orders.add_integer_column("qty", Some(3)).unwrap();
    orders.add_real_column("px", None).unwrap();
    orders.add_row("sku", "B-200").unwrap();
    orders.add_row("qty", 7).unwrap();
    orders
}

#[test]
fn test_columns_are_ragged() {
    let orders = orders();
    assert_eq!(orders.number_of_rows("sku").unwrap(), 2);
    assert_eq!(orders.number_of_rows("px").unwrap(), 1);
    assert_eq!(orders.to_string(), "sku: A-100,B-200,\nqty: 3,7,\npx: ~~NULL~~,\n");
    assert!(orders.cell(0, "px").unwrap().is_null());
    assert!(orders.to_string().contains(NULL_MARKER));
}

#[test]
fn test_failed_operations_leave_container_untouched() {
    let mut orders = orders();
    let before = orders.to_string();

    assert!(orders.add_text_column("qty", Some("dup")).is_err());
    assert!(orders.add_row("qty", "seven").is_err());
    assert!(orders.add_row("missing", 1).is_err());
    assert!(orders.remove_row("sku", 5).is_err());
    assert!(orders.set_value(0, "qty", "not a number").is_err());

    assert_eq!(orders.to_string(), before);
}

#[test]
fn test_null_column_fixes_kind_on_first_value() {
    let mut container = Container::new();
    container.add_null_column("maybe").unwrap();
    assert_eq!(container.column_kind("maybe").unwrap(), ValueKind::Absent);

    let when = NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    container.add_row("maybe", when).unwrap();
    assert_eq!(container.column_kind("maybe").unwrap(), ValueKind::Timestamp);
    assert!(container.add_row("maybe", 1).is_err());
    assert_eq!(container.to_string(), "maybe: ~~NULL~~,2020-01-02 03:04:05,\n");
}

#[test]
fn test_nested_rendering_is_indented() {
    let mut leaf = Container::new();
    leaf.add_bool_column("ok", Some(true)).unwrap();

    let mut middle = Container::new();
    middle.add_integer_column("n", Some(1)).unwrap();
    middle.add_container_column("leaf", leaf).unwrap();

    let mut root = Container::new();
    root.add_container_column("middle", middle).unwrap();

    assert_eq!(
        root.to_string(),
        "middle:  {\n    n: 1,\n    leaf:  {\n        ok: true,\n}\n\n}\n\n"
    );
}

#[test]
fn test_entries_distinguish_cells_and_containers() {
    let mut root = Container::new();
    root.add_integer_column("n", None).unwrap();
    root.add_container_column("child", Container::new()).unwrap();

    let cell = root.get(0, "n").unwrap();
    let child = root.get(0, "child").unwrap();
    assert!(cell.is_null());
    assert!(!cell.is_container());
    assert!(child.is_container());
    assert_eq!(child.kind(), ValueKind::Nested);
    assert!(matches!(child, Entry::Container(c) if c.is_empty()));
    assert!(child.structural_eq(cell).is_err());
    assert!(root.cell(0, "child").is_err());
    assert!(root.container(0, "n").is_err());
}

#[test]
fn test_nested_container_in_system_notifies_parent() {
    fn total(system: &mut System<u32>, lines: usize, sum: usize) -> Result<DependencyResult> {
        let lines = system.nested(lines)?;
        let mut total = 0;
        for entry in lines.rows("qty")? {
            if let Some(qty) = entry.as_cell().and_then(|cell| cell.get().as_integer()) {
                total += qty;
            }
        }
        *system.context_mut() += 1;
        system.set_value(sum, total)?;
        Ok(DependencyResult::Success)
    }

    let mut order: System<u32> = System::new();
    order.add_container_column("lines", orders()).unwrap();
    order.add_integer_column("total_qty", Some(0)).unwrap();
    order.add_dependency("lines", "total_qty", total).unwrap();

    let changed = order
        .update_container("lines", |lines| {
            lines.add_row("qty", 5)?;
            Ok(true)
        })
        .unwrap();
    assert!(changed);
    assert_eq!(order.value("total_qty").unwrap(), &Value::Integer(15));
    assert_eq!(*order.context(), 1);

    // An edit that reports no change does not propagate
    order.update_container("lines", |_| Ok(false)).unwrap();
    assert_eq!(*order.context(), 1);

    order.assign_container("lines", &orders()).unwrap();
    assert_eq!(order.value("total_qty").unwrap(), &Value::Integer(10));
    assert_eq!(*order.context(), 2);

    assert!(order.set_value("lines", 1).is_err());
    assert!(order.value("lines").is_err());
}
