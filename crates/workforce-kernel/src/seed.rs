//! The demo data set the console starts with.
//!
//! Seven employees under a single CEO, four open requests, six Draft payroll
//! entries and four assets. Seeded requests carry only the requester's
//! display name.

use crate::store::EntityStore;
use crate::types::*;
use chrono::NaiveDate;

/// Reference "today" of the demo data set.
pub const DEMO_TODAY: (i32, u32, u32) = (2023, 11, 24);

/// Signed-in identity when the console starts (Anna Mueller, HR).
pub const DEMO_SIGNED_IN: &str = "3";

pub fn demo_today() -> NaiveDate {
    date(DEMO_TODAY.0, DEMO_TODAY.1, DEMO_TODAY.2)
}

pub fn demo_store() -> EntityStore {
    let mut store = EntityStore::new();
    for employee in demo_employees() {
        store.put_employee(employee);
    }
    for request in demo_requests() {
        store.put_request(request);
    }
    for entry in demo_payroll() {
        store.put_payroll_entry(entry);
    }
    for asset in demo_assets() {
        store.put_asset(asset);
    }
    store
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

struct Person {
    id: &'static str,
    name: &'static str,
    role: Role,
    avatar: &'static str,
    department: &'static str,
    location: &'static str,
    manager: Option<&'static str>,
    status: EmployeeStatus,
    phone: &'static str,
    start: (i32, u32, u32),
    contract: ContractType,
    vacation: (u32, u32, u32),
    address: &'static str,
    emergency_contact: &'static str,
    iban: &'static str,
}

impl Person {
    fn into_employee(self) -> Employee {
        let first = self.name.split(' ').next().unwrap_or(self.name);
        Employee {
            id: self.id.into(),
            name: self.name.to_string(),
            role: self.role,
            avatar: self.avatar.to_string(),
            department: self.department.to_string(),
            location: self.location.to_string(),
            manager_id: self.manager.map(EmployeeId::from),
            status: self.status,
            email: format!("{}@acme.com", first.to_lowercase()),
            phone: self.phone.to_string(),
            start_date: date(self.start.0, self.start.1, self.start.2),
            contract_type: self.contract,
            vacation_entitlement: self.vacation.0,
            vacation_used: self.vacation.1,
            sick_days: self.vacation.2,
            address: self.address.to_string(),
            emergency_contact: self.emergency_contact.to_string(),
            iban: self.iban.to_string(),
        }
    }
}

fn demo_employees() -> Vec<Employee> {
    use ContractType::{FullTime, PartTime};
    use EmployeeStatus::{Active, Onboarding};

    [
        Person {
            id: "1",
            name: "Jane Executive",
            role: Role::Ceo,
            avatar: "JE",
            department: "Leadership",
            location: "New York",
            manager: None,
            status: Active,
            phone: "+1 202 555 0101",
            start: (2020, 1, 1),
            contract: FullTime,
            vacation: (30, 12, 0),
            address: "123 Wall St, NY",
            emergency_contact: "Mark Executive (Husband)",
            iban: "US123456789",
        },
        Person {
            id: "2",
            name: "Mike VP",
            role: Role::Vp,
            avatar: "MV",
            department: "Engineering",
            location: "London",
            manager: Some("1"),
            status: Active,
            phone: "+44 20 7946 0123",
            start: (2021, 3, 15),
            contract: FullTime,
            vacation: (28, 20, 2),
            address: "45 Oxford St, London",
            emergency_contact: "Sarah VP (Wife)",
            iban: "GB123456789",
        },
        Person {
            id: "3",
            name: "Anna Mueller",
            role: Role::Hr,
            avatar: "AM",
            department: "People",
            location: "Berlin",
            manager: Some("1"),
            status: Active,
            phone: "+49 30 123456",
            start: (2019, 6, 1),
            contract: FullTime,
            vacation: (30, 5, 4),
            address: "Torstraße 1, Berlin",
            emergency_contact: "Hans Mueller (Father)",
            iban: "DE123456789",
        },
        Person {
            id: "4",
            name: "Sarah Smith",
            role: Role::Manager,
            avatar: "SS",
            department: "Engineering",
            location: "London",
            manager: Some("2"),
            status: Active,
            phone: "+44 7700 900555",
            start: (2022, 1, 10),
            contract: FullTime,
            vacation: (25, 15, 1),
            address: "10 Baker St, London",
            emergency_contact: "John Smith (Brother)",
            iban: "GB987654321",
        },
        Person {
            id: "5",
            name: "John Doe",
            role: Role::Employee,
            avatar: "JD",
            department: "Engineering",
            location: "Remote",
            manager: Some("4"),
            status: Active,
            phone: "+1 555 0199",
            start: (2023, 5, 1),
            contract: FullTime,
            vacation: (25, 0, 0),
            address: "Remote Blvd 99",
            emergency_contact: "Jane Doe (Mother)",
            iban: "US987654321",
        },
        Person {
            id: "6",
            name: "Emily Dev",
            role: Role::Employee,
            avatar: "ED",
            department: "Engineering",
            location: "Berlin",
            manager: Some("4"),
            status: Onboarding,
            phone: "+49 151 555666",
            start: (2023, 11, 1),
            contract: PartTime,
            vacation: (15, 0, 0),
            address: "Kreuzberg 55, Berlin",
            emergency_contact: "Tom Dev (Partner)",
            iban: "DE987654321",
        },
        Person {
            id: "7",
            name: "David IT",
            role: Role::ItAdmin,
            avatar: "DI",
            department: "IT",
            location: "Berlin",
            manager: Some("2"),
            status: Active,
            phone: "+49 30 999888",
            start: (2021, 1, 1),
            contract: FullTime,
            vacation: (30, 10, 1),
            address: "Server Room 1",
            emergency_contact: "The Internet",
            iban: "DE11223344",
        },
    ]
    .into_iter()
    .map(Person::into_employee)
    .collect()
}

fn demo_requests() -> Vec<Request> {
    let today = demo_today();
    let days_ago = |n: i64| today - chrono::Duration::days(n);

    let request = |id: &str, requester: &str, title: &str, details: &str, on, body| Request {
        id: id.into(),
        requester: Requester::named(requester),
        title: title.to_string(),
        details: details.to_string(),
        submitted_on: on,
        status: RequestStatus::Pending,
        body,
    };

    let mut vpn = request(
        "r4",
        "Sarah Smith",
        "VPN Access",
        "Need access to staging environment",
        days_ago(1),
        RequestBody::Ticket {
            assignee_id: Some("7".into()),
        },
    );
    vpn.status = RequestStatus::InProgress;

    vec![
        request(
            "r1",
            "Sarah Smith",
            "Vacation",
            "Dec 24 - Dec 31",
            days_ago(1),
            RequestBody::Leave {
                leave_type: "Vacation".to_string(),
                start: date(2023, 12, 24),
                end: date(2023, 12, 31),
            },
        ),
        request(
            "r2",
            "John Doe",
            "Team Lunch",
            "Pizza for release party",
            today,
            RequestBody::Expense {
                amount: Amount::from_minor(12_050),
            },
        ),
        request(
            "r3",
            "Mike VP",
            "Laptop Issue",
            "Screen flickering occasionally",
            days_ago(2),
            RequestBody::Ticket { assignee_id: None },
        ),
        vpn,
    ]
}

fn demo_payroll() -> Vec<PayrollEntry> {
    let payout = date(2023, 11, 28);
    [
        ("1", 15_000, 0, 0, Currency::Eur),
        ("2", 12_000, 2_000, 0, Currency::Eur),
        ("3", 7_000, 0, 50, Currency::Eur),
        ("4", 8_500, 1_500, 0, Currency::Gbp),
        ("5", 6_000, 0, 0, Currency::Usd),
        ("6", 5_500, 500, 0, Currency::Eur),
    ]
    .into_iter()
    .map(|(id, base_salary, bonus, deductions, currency)| PayrollEntry {
        employee_id: id.into(),
        base_salary,
        bonus,
        deductions,
        currency,
        status: PayrollStatus::Draft,
        payout_date: payout,
    })
    .collect()
}

fn demo_assets() -> Vec<Asset> {
    let asset = |id: &str, kind, model: &str, serial: &str, holder: Option<&str>, bought| Asset {
        id: id.into(),
        kind,
        model: model.to_string(),
        serial_number: serial.to_string(),
        purchase_date: bought,
        status: if holder.is_some() {
            AssetStatus::InUse
        } else {
            AssetStatus::Available
        },
        assigned_to: holder.map(EmployeeId::from),
    };

    vec![
        asset("a1", AssetKind::Laptop, "MacBook Pro 16\"", "C02XXXXX", Some("2"), date(2023, 1, 15)),
        asset("a2", AssetKind::Laptop, "Dell XPS 13", "DL12345", Some("5"), date(2023, 5, 10)),
        asset("a3", AssetKind::Monitor, "Dell UltraSharp 27\"", "M123456", Some("5"), date(2023, 5, 10)),
        asset("a4", AssetKind::Laptop, "MacBook Air M2", "C02YYYYY", None, date(2023, 10, 1)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_store_is_consistent() {
        let store = demo_store();
        assert_eq!(store.employee_count(), 7);
        assert_eq!(store.requests().count(), 4);
        assert_eq!(store.payroll_entries().count(), 6);
        assert!(store.assets().all(Asset::is_consistent));
        assert_eq!(
            store.employee(&"3".into()).map(|e| e.email.as_str()),
            Some("anna@acme.com")
        );
    }

    #[test]
    fn seeded_requests_match_console() {
        let store = demo_store();
        let r2 = store.request(&"r2".into()).unwrap();
        assert_eq!(r2.amount().map(|a| a.to_string()), Some("120.50".to_string()));
        let r4 = store.request(&"r4".into()).unwrap();
        assert_eq!(r4.status, RequestStatus::InProgress);
        assert_eq!(r4.assignee_id(), Some(&EmployeeId::from("7")));
        assert!(store.requests().all(|r| r.requester.employee_id.is_none()));
    }
}
