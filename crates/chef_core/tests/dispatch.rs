use chef_core::{
    ActionDispatcher, Appliance, CookError, DispatchOutcome, PendingAction, SuggestedAction,
    TimerBoard,
};

fn timer_action(id: u64, minutes: i32, hint: &str, label: &str) -> PendingAction {
    PendingAction {
        id,
        action: SuggestedAction::Timer {
            duration_minutes: minutes,
            appliance_hint: hint.to_string(),
            label: label.to_string(),
            description: format!("Cook for {minutes} minutes"),
        },
    }
}

fn temperature_action(id: u64, value: i32) -> PendingAction {
    PendingAction {
        id,
        action: SuggestedAction::Temperature {
            value_fahrenheit: Some(value),
            appliance_hint: "OVEN".to_string(),
            description: format!("Preheat to {value}"),
        },
    }
}

#[test]
fn timer_action_starts_a_running_timer() {
    let board = TimerBoard::new();
    let mut dispatcher = ActionDispatcher::new(board.clone());

    let outcome = dispatcher
        .dispatch(&timer_action(1, 12, "STOVE", "Simmer sauce"))
        .unwrap();

    let DispatchOutcome::TimerStarted(timer_id) = outcome else {
        panic!("expected a timer, got {outcome:?}");
    };
    let timer = board.get(timer_id).unwrap();
    assert_eq!(timer.duration_secs(), 12 * 60);
    assert_eq!(timer.appliance(), Appliance::Stovetop);
    assert_eq!(timer.label(), "Simmer sauce");
    assert!(timer.is_running());
    assert!(dispatcher.notice().is_none());
}

#[test]
fn empty_timer_label_falls_back_to_description() {
    let board = TimerBoard::new();
    let mut dispatcher = ActionDispatcher::new(board.clone());

    let DispatchOutcome::TimerStarted(timer_id) = dispatcher
        .dispatch(&timer_action(1, 3, "other", "  "))
        .unwrap()
    else {
        panic!("expected a timer");
    };
    assert_eq!(board.get(timer_id).unwrap().label(), "Cook for 3 minutes");
    assert_eq!(board.get(timer_id).unwrap().appliance(), Appliance::Other);
}

#[test]
fn non_positive_timer_minutes_are_rejected() {
    let board = TimerBoard::new();
    let mut dispatcher = ActionDispatcher::new(board.clone());

    assert_eq!(
        dispatcher.dispatch(&timer_action(1, 0, "oven", "x")),
        Err(CookError::InvalidDuration)
    );
    assert_eq!(
        dispatcher.dispatch(&timer_action(2, -5, "oven", "x")),
        Err(CookError::InvalidDuration)
    );
    assert!(board.snapshot().is_empty());
}

#[test]
fn temperature_action_raises_notice_without_timers() {
    let board = TimerBoard::new();
    let mut dispatcher = ActionDispatcher::new(board.clone());

    let outcome = dispatcher.dispatch(&temperature_action(4, 350)).unwrap();

    assert_eq!(outcome, DispatchOutcome::NoticeRaised);
    assert!(board.snapshot().is_empty());
    assert!(dispatcher.is_showing_notice());
    let notice = dispatcher.notice().unwrap();
    assert_eq!(notice.action_id, 4);
    assert_eq!(notice.value_fahrenheit, Some(350));
    assert_eq!(notice.appliance, Appliance::Oven);
}

#[test]
fn second_temperature_notice_supersedes_the_first() {
    let mut dispatcher = ActionDispatcher::new(TimerBoard::new());

    dispatcher.dispatch(&temperature_action(1, 350)).unwrap();
    dispatcher.dispatch(&temperature_action(2, 425)).unwrap();

    let notice = dispatcher.acknowledge().unwrap();
    assert_eq!(notice.action_id, 2);
    assert_eq!(notice.value_fahrenheit, Some(425));
    assert!(dispatcher.acknowledge().is_none());
    assert!(!dispatcher.is_showing_notice());
}
