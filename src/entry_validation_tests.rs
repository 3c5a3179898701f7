// src/entry_validation_tests.rs

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::config::SystemConfig;
    use crate::daily_capacity::check_daily_capacity;
    use crate::entry_validation::{EntryRequest, HourEntryValidator};
    use crate::errors::EngineError;
    use crate::ledger_data::{Holiday, Period, Project, TaskKind, UserProfile};
    use crate::store::MemoryStore;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("invalid date string: {}", date_str))
    }

    fn august_period(id: &str, user: &str, cap: Decimal, active: bool) -> Period {
        let mut period = Period::new(
            id,
            user,
            "August 2025",
            d("2025-08-01"),
            d("2025-08-31"),
            160,
            cap,
        )
        .unwrap();
        period.active = active;
        period
    }

    fn project_for(user: &str) -> Project {
        Project {
            id: format!("{user}-proj"),
            user_id: user.to_string(),
            name: "Internal tooling".to_string(),
            active: true,
        }
    }

    fn request(user: &str, date: &str, hours: Decimal) -> EntryRequest {
        EntryRequest {
            user_id: user.to_string(),
            project: project_for(user),
            date: d(date),
            hours,
            description: "Sprint work".to_string(),
            task_kind: TaskKind::Task,
            explicit_period: None,
            editing_entry_id: None,
            reference_date: None,
        }
    }

    fn holiday(user: &str, date: &str, name: &str) -> Holiday {
        Holiday {
            user_id: user.to_string(),
            date: d(date),
            name: name.to_string(),
            description: None,
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Store seeded with an active August 2025 period (cap 8.0) for "maria".
    fn setup() -> (Arc<MemoryStore>, HourEntryValidator<MemoryStore>) {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        store.upsert_period(august_period("A", "maria", dec!(8.0), true));
        let validator = HourEntryValidator::new(store.clone(), SystemConfig::default());
        (store, validator)
    }

    #[test]
    fn weekday_entry_within_cap_resolves_to_active_period() {
        let (_store, validator) = setup();

        let prepared = validator
            .validate_and_prepare(&request("maria", "2025-08-15", dec!(4.0)))
            .expect("4h on a Friday inside the active period should pass");

        assert_eq!(prepared.period_id.as_deref(), Some("A"));
        assert_eq!(prepared.hours, dec!(4.0));
        assert_eq!(prepared.date, d("2025-08-15"));
    }

    #[test]
    fn second_entry_over_the_cap_reports_current_total_and_cap() {
        let (store, validator) = setup();
        let first = validator
            .validate_and_prepare(&request("maria", "2025-08-15", dec!(4.0)))
            .unwrap();
        store.insert_entry(first.into_entry("e1"));

        let result = validator.validate_and_prepare(&request("maria", "2025-08-15", dec!(5.0)));

        assert_eq!(
            result,
            Err(EngineError::DailyCapExceeded {
                date: d("2025-08-15"),
                current_total: dec!(4.0),
                cap: dec!(8.0),
            })
        );
    }

    #[test]
    fn saturday_entry_is_rejected() {
        let (_store, validator) = setup();

        let result = validator.validate_and_prepare(&request("maria", "2025-08-16", dec!(2.0)));

        assert_eq!(
            result,
            Err(EngineError::WeekendNotAllowed {
                date: d("2025-08-16")
            })
        );
    }

    #[test]
    fn allow_weekends_config_relaxes_the_weekend_rule() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_period(august_period("A", "maria", dec!(8.0), true));
        let config = SystemConfig {
            allow_weekends: true,
            ..SystemConfig::default()
        };
        let validator = HourEntryValidator::new(store, config);

        let prepared = validator
            .validate_and_prepare(&request("maria", "2025-08-16", dec!(2.0)))
            .expect("Saturday should pass with allow_weekends on");
        assert_eq!(prepared.date, d("2025-08-16"));
    }

    #[test]
    fn weekday_holiday_is_rejected() {
        let (store, validator) = setup();
        store
            .insert_holiday(holiday("maria", "2025-08-18", "Local holiday"))
            .unwrap();

        let result = validator.validate_and_prepare(&request("maria", "2025-08-18", dec!(3.0)));

        assert_eq!(
            result,
            Err(EngineError::HolidayNotAllowed {
                date: d("2025-08-18")
            })
        );
    }

    #[test]
    fn weekend_holiday_still_reports_holiday_when_weekends_are_allowed() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_period(august_period("A", "maria", dec!(8.0), true));
        store
            .insert_holiday(holiday("maria", "2025-08-17", "Town festival"))
            .unwrap();
        let config = SystemConfig {
            allow_weekends: true,
            ..SystemConfig::default()
        };
        let validator = HourEntryValidator::new(store, config);

        let result = validator.validate_and_prepare(&request("maria", "2025-08-17", dec!(3.0)));

        assert_eq!(
            result,
            Err(EngineError::HolidayNotAllowed {
                date: d("2025-08-17")
            })
        );
    }

    #[test]
    fn hours_outside_range_or_off_the_half_hour_grid_are_rejected() {
        let (_store, validator) = setup();

        for hours in [dec!(0.25), dec!(0.0), dec!(12.5), dec!(4.3)] {
            let result = validator.validate_and_prepare(&request("maria", "2025-08-15", hours));
            assert!(
                matches!(result, Err(EngineError::InvalidHours { .. })),
                "{hours} should be invalid, got {result:?}"
            );
        }
    }

    #[test]
    fn boundary_hours_pass_the_shape_check() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_period(august_period("A", "maria", dec!(12.0), true));
        let validator = HourEntryValidator::new(store, SystemConfig::default());

        for hours in [dec!(0.5), dec!(12.0)] {
            let result = validator.validate_and_prepare(&request("maria", "2025-08-15", hours));
            assert!(result.is_ok(), "{hours} should pass, got {result:?}");
        }
    }

    #[test]
    fn profile_hour_bounds_override_system_defaults() {
        let (store, validator) = setup();
        store.set_profile(UserProfile {
            user_id: "maria".to_string(),
            daily_cap: None,
            min_hours: dec!(0.25),
            max_hours: dec!(10.0),
            hours_increment: dec!(0.25),
        });

        assert!(validator
            .validate_and_prepare(&request("maria", "2025-08-15", dec!(0.75)))
            .is_ok());
        let result = validator.validate_and_prepare(&request("maria", "2025-08-15", dec!(0.8)));
        assert!(matches!(result, Err(EngineError::InvalidHours { .. })));
    }

    #[test]
    fn editing_an_entry_excludes_its_own_hours_from_the_capacity_sum() {
        let (store, validator) = setup();
        let first = validator
            .validate_and_prepare(&request("maria", "2025-08-15", dec!(4.0)))
            .unwrap();
        store.insert_entry(first.into_entry("e1"));

        // Growing the same entry to the full cap is fine.
        let mut edit = request("maria", "2025-08-15", dec!(8.0));
        edit.editing_entry_id = Some("e1".to_string());
        let prepared = validator
            .validate_and_prepare(&edit)
            .expect("edit excluding its own row should pass");
        assert_eq!(prepared.editing_entry_id.as_deref(), Some("e1"));

        // The same amount as a new entry is over the cap.
        let result = validator.validate_and_prepare(&request("maria", "2025-08-15", dec!(8.0)));
        assert!(matches!(result, Err(EngineError::DailyCapExceeded { .. })));
    }

    #[test]
    fn other_users_entries_do_not_count_against_the_cap() {
        let (store, validator) = setup();
        store.upsert_period(august_period("B", "carlos", dec!(8.0), true));
        let other = HourEntryValidator::new(store.clone(), SystemConfig::default());
        let prepared = other
            .validate_and_prepare(&request("carlos", "2025-08-15", dec!(8.0)))
            .unwrap();
        store.insert_entry(prepared.into_entry("c1"));

        assert!(validator
            .validate_and_prepare(&request("maria", "2025-08-15", dec!(8.0)))
            .is_ok());
    }

    #[test]
    fn ad_hoc_entry_without_any_period_uses_the_system_default_cap() {
        let store = Arc::new(MemoryStore::new());
        let validator = HourEntryValidator::new(store.clone(), SystemConfig::default());

        let prepared = validator
            .validate_and_prepare(&request("maria", "2025-08-15", dec!(8.0)))
            .expect("ad-hoc entry with no period should pass under the default cap");
        assert_eq!(prepared.period_id, None);

        store.insert_entry(prepared.into_entry("e1"));
        let result = validator.validate_and_prepare(&request("maria", "2025-08-15", dec!(0.5)));
        assert_eq!(
            result,
            Err(EngineError::DailyCapExceeded {
                date: d("2025-08-15"),
                current_total: dec!(8.0),
                cap: dec!(8.0),
            })
        );
    }

    #[test]
    fn profile_cap_applies_when_no_period_resolves() {
        let store = Arc::new(MemoryStore::new());
        store.set_profile(UserProfile {
            daily_cap: Some(dec!(6.0)),
            ..UserProfile::provision("maria", &SystemConfig::default())
        });
        let validator = HourEntryValidator::new(store, SystemConfig::default());

        let result = validator.validate_and_prepare(&request("maria", "2025-08-15", dec!(6.5)));
        assert_eq!(
            result,
            Err(EngineError::DailyCapExceeded {
                date: d("2025-08-15"),
                current_total: dec!(0.0),
                cap: dec!(6.0),
            })
        );
    }

    #[test]
    fn period_cap_overrides_profile_and_system_caps() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_period(august_period("A", "maria", dec!(5.0), true));
        store.set_profile(UserProfile {
            daily_cap: Some(dec!(7.0)),
            ..UserProfile::provision("maria", &SystemConfig::default())
        });
        let validator = HourEntryValidator::new(store, SystemConfig::default());

        let result = validator.validate_and_prepare(&request("maria", "2025-08-15", dec!(5.5)));
        assert_eq!(
            result,
            Err(EngineError::DailyCapExceeded {
                date: d("2025-08-15"),
                current_total: dec!(0.0),
                cap: dec!(5.0),
            })
        );
    }

    #[test]
    fn explicit_period_of_another_user_is_rejected() {
        let (store, validator) = setup();
        store.upsert_period(august_period("B", "carlos", dec!(8.0), false));

        let mut req = request("maria", "2025-08-15", dec!(2.0));
        req.explicit_period = Some("B".to_string());
        let result = validator.validate_and_prepare(&req);

        assert_eq!(
            result,
            Err(EngineError::PeriodNotOwned {
                period_id: "B".to_string(),
                user_id: "maria".to_string(),
            })
        );
    }

    #[test]
    fn unknown_explicit_period_is_rejected() {
        let (_store, validator) = setup();

        let mut req = request("maria", "2025-08-15", dec!(2.0));
        req.explicit_period = Some("missing".to_string());
        let result = validator.validate_and_prepare(&req);

        assert_eq!(
            result,
            Err(EngineError::UnknownPeriod {
                period_id: "missing".to_string(),
            })
        );
    }

    #[test]
    fn project_owned_by_another_user_is_rejected() {
        let (_store, validator) = setup();

        let mut req = request("maria", "2025-08-15", dec!(2.0));
        req.project = project_for("carlos");
        let result = validator.validate_and_prepare(&req);

        assert_eq!(
            result,
            Err(EngineError::CrossUserReference {
                entity: "project",
                owner: "carlos".to_string(),
                user: "maria".to_string(),
            })
        );
    }

    #[test]
    fn future_and_stale_dates_are_rejected_when_a_reference_date_is_given() {
        let (_store, validator) = setup();

        let mut future = request("maria", "2025-08-21", dec!(2.0));
        future.reference_date = Some(d("2025-08-20"));
        assert_eq!(
            validator.validate_and_prepare(&future),
            Err(EngineError::FutureDate {
                date: d("2025-08-21")
            })
        );

        let mut stale = request("maria", "2024-08-01", dec!(2.0));
        stale.reference_date = Some(d("2025-08-20"));
        assert_eq!(
            validator.validate_and_prepare(&stale),
            Err(EngineError::StaleDate {
                date: d("2024-08-01"),
                max_age_days: 365,
            })
        );
    }

    #[test]
    fn validation_is_deterministic_for_identical_state() {
        let (store, validator) = setup();
        let first = validator
            .validate_and_prepare(&request("maria", "2025-08-15", dec!(3.0)))
            .unwrap();
        store.insert_entry(first.clone().into_entry("e1"));

        let req = request("maria", "2025-08-15", dec!(6.0));
        let once = validator.validate_and_prepare(&req);
        let again = validator.validate_and_prepare(&req);
        assert_eq!(once, again);
    }

    #[test]
    fn accepted_state_stays_within_the_cap_on_revalidation() {
        let (store, validator) = setup();
        for (id, hours) in [("e1", dec!(4.0)), ("e2", dec!(4.0))] {
            let prepared = validator
                .validate_and_prepare(&request("maria", "2025-08-15", hours))
                .unwrap();
            store.insert_entry(prepared.into_entry(id));
        }

        // The persisted day is exactly at the cap; any further half hour fails.
        let result = validator.validate_and_prepare(&request("maria", "2025-08-15", dec!(0.5)));
        assert_eq!(
            result,
            Err(EngineError::DailyCapExceeded {
                date: d("2025-08-15"),
                current_total: dec!(8.0),
                cap: dec!(8.0),
            })
        );
    }

    #[test]
    fn capacity_check_is_exact_at_the_half_hour_boundary() {
        let (store, validator) = setup();
        for (id, hours) in [
            ("e1", dec!(2.5)),
            ("e2", dec!(2.5)),
            ("e3", dec!(1.5)),
            ("e4", dec!(1.0)),
        ] {
            let prepared = validator
                .validate_and_prepare(&request("maria", "2025-08-15", hours))
                .unwrap();
            store.insert_entry(prepared.into_entry(id));
        }

        // 7.5h booked: one more half hour lands exactly on the cap.
        let user = "maria".to_string();
        let prior =
            check_daily_capacity(&*store, &user, d("2025-08-15"), dec!(0.5), dec!(8.0), None)
                .expect("exactly reaching the cap must pass");
        assert_eq!(prior, dec!(7.5));

        let over = check_daily_capacity(&*store, &user, d("2025-08-15"), dec!(1.0), dec!(8.0), None);
        assert_eq!(
            over,
            Err(EngineError::DailyCapExceeded {
                date: d("2025-08-15"),
                current_total: dec!(7.5),
                cap: dec!(8.0),
            })
        );
    }
}
