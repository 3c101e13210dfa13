use envs::{Env, EnvError, Page, Persona, Snapshot, UiAction, WebFlowConfig, WebFlowEnv};

const CLICK_LOGIN: usize = UiAction::ClickLogin.index();
const SAVE_PROFILE: usize = UiAction::SaveProfile.index();
const RANDOM_CLICK: usize = UiAction::RandomClick.index();
const RESET_FORM: usize = UiAction::ResetForm.index();

fn reliable() -> WebFlowConfig {
    WebFlowConfig {
        login_fault_rate: 0.0,
        save_fault_rate: 0.0,
        random_click_fault_rate: 0.0,
        ..WebFlowConfig::default()
    }
}

fn broken() -> WebFlowConfig {
    WebFlowConfig {
        login_fault_rate: 1.0,
        save_fault_rate: 1.0,
        random_click_fault_rate: 1.0,
        ..WebFlowConfig::default()
    }
}

#[test]
fn reset_observation() {
    let mut env = WebFlowEnv::new(Persona::Explorer, Some(1));
    let obs = env.reset(None);
    assert_eq!(obs, vec![1.0, 0.0, 0.0, 0.0, 0.4, 0.0]);
    assert_eq!(env.page(), Page::Login);
    assert!(!env.has_error());
    assert!(env.visited_pages().contains(&Page::Login));
    assert_eq!(env.visited_pages().len(), 1);
}

#[test]
fn survivor_successful_login() {
    let mut env = WebFlowEnv::with_config(reliable(), Persona::Survivor, Some(1));
    let t = env.step(CLICK_LOGIN).unwrap();
    assert_eq!(env.page(), Page::Profile);
    assert_eq!(t.reward, 1.0);
    assert!(!t.terminated);
    assert_eq!(t.obs, vec![0.0, 1.0, 0.0, 0.0, 0.4, 2.0 / 6.0]);
    assert_eq!(t.info.death_reason, None);
}

#[test]
fn failed_login_stays_on_login_with_error() {
    let mut survivor = WebFlowEnv::with_config(broken(), Persona::Survivor, Some(1));
    let t = survivor.step(CLICK_LOGIN).unwrap();
    assert_eq!(survivor.page(), Page::Login);
    assert!(survivor.has_error());
    assert_eq!(t.obs[3], 1.0);
    assert_eq!(t.reward, -8.0);

    let mut explorer = WebFlowEnv::with_config(broken(), Persona::Explorer, Some(1));
    let t = explorer.step(CLICK_LOGIN).unwrap();
    assert_eq!(t.reward, -2.0);
}

#[test]
fn login_succeeds_with_expected_frequency() {
    let mut env = WebFlowEnv::new(Persona::Survivor, Some(2024));
    let trials = 10_000;
    let mut profile = 0;
    for _ in 0..trials {
        env.reset(None);
        env.step(CLICK_LOGIN).unwrap();
        match env.page() {
            Page::Profile => {
                assert!(!env.has_error());
                profile += 1;
            }
            Page::Login => assert!(env.has_error()),
            Page::Done => panic!("login cannot skip the profile page"),
        }
    }
    let rate = f64::from(profile) / f64::from(trials);
    assert!((rate - 0.88).abs() < 0.02, "success rate {rate}");
}

#[test]
fn save_succeeds_with_expected_frequency() {
    let config = WebFlowConfig { login_fault_rate: 0.0, ..WebFlowConfig::default() };
    let mut env = WebFlowEnv::with_config(config, Persona::Survivor, Some(99));
    let trials = 10_000;
    let mut done = 0;
    for _ in 0..trials {
        env.reset(None);
        env.step(CLICK_LOGIN).unwrap();
        assert_eq!(env.page(), Page::Profile);
        let t = env.step(SAVE_PROFILE).unwrap();
        match env.page() {
            Page::Done => {
                assert!(t.terminated);
                done += 1;
            }
            Page::Profile => assert!(env.has_error() && !t.terminated),
            Page::Login => panic!("saving cannot return to login"),
        }
    }
    let rate = f64::from(done) / f64::from(trials);
    assert!((rate - 0.90).abs() < 0.02, "success rate {rate}");
}

#[test]
fn random_click_errors_with_expected_frequency() {
    let mut env = WebFlowEnv::new(Persona::Explorer, Some(314));
    let trials = 10_000;
    let mut errors = 0;
    for _ in 0..trials {
        env.reset(None);
        env.step(RANDOM_CLICK).unwrap();
        assert_eq!(env.page(), Page::Login);
        if env.has_error() {
            errors += 1;
        }
    }
    let rate = f64::from(errors) / f64::from(trials);
    assert!((rate - 0.20).abs() < 0.02, "error rate {rate}");
}

#[test]
fn keeps_the_configuration_it_was_built_with() {
    let env = WebFlowEnv::with_config(broken(), Persona::Survivor, Some(1));
    assert_eq!(env.persona(), Persona::Survivor);
    assert_eq!(env.config().login_fault_rate, 1.0);
    assert_eq!(env.config().form_fill_level, 0.4);

    let default = WebFlowEnv::new(Persona::Explorer, None);
    assert_eq!(default.persona(), Persona::Explorer);
    assert_eq!(default.config().save_fault_rate, 0.10);
    assert_eq!(default.config().random_click_fault_rate, 0.20);
    assert_eq!(default.config().max_steps, 50);
}

#[test]
fn reset_form_always_returns_to_clean_login() {
    let mut rng = fastrand::Rng::with_seed(7);
    for seed in 0..200 {
        let mut env = WebFlowEnv::new(Persona::Explorer, Some(seed));
        for _ in 0..rng.usize(0..10) {
            if env.step(rng.usize(0..6)).unwrap().is_done() {
                env.reset(None);
            }
        }
        let t = env.step(RESET_FORM).unwrap();
        assert_eq!(&t.obs[..4], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(env.page(), Page::Login);
        assert!(!env.has_error());
    }
}

#[test]
fn reset_form_overrides_faults_in_the_same_tick() {
    let mut env = WebFlowEnv::with_config(broken(), Persona::Survivor, Some(3));
    env.step(RANDOM_CLICK).unwrap();
    assert!(env.has_error());
    let t = env.step(RESET_FORM).unwrap();
    assert!(!env.has_error());
    assert_eq!(t.reward, 1.0);
    assert_eq!(t.obs[5], 1.0);
}

#[test]
fn random_click_raises_error_without_moving() {
    let mut env = WebFlowEnv::with_config(
        WebFlowConfig { random_click_fault_rate: 1.0, ..reliable() },
        Persona::Survivor,
        Some(5),
    );
    env.step(CLICK_LOGIN).unwrap();
    let t = env.step(RANDOM_CLICK).unwrap();
    assert_eq!(env.page(), Page::Profile);
    assert!(env.has_error());
    assert_eq!(t.reward, -8.0);

    // A successful transition clears the flag.
    let t = env.step(SAVE_PROFILE).unwrap();
    assert_eq!(env.page(), Page::Done);
    assert!(!env.has_error());
    assert_eq!(t.reward, 5.0);
}

#[test]
fn typing_actions_leave_state_alone() {
    let mut env = WebFlowEnv::new(Persona::Survivor, Some(9));
    for action in [0, 1, 3] {
        let t = env.step(action).unwrap();
        assert_eq!(env.page(), Page::Login);
        assert!(!env.has_error());
        assert_eq!(&t.obs[..5], &[1.0, 0.0, 0.0, 0.0, 0.4]);
        assert_eq!(t.obs[5], action as f32 / 6.0);
        assert_eq!(t.reward, 1.0);
    }
    // Saving the profile from the login page does nothing either.
    env.step(SAVE_PROFILE).unwrap();
    assert_eq!(env.page(), Page::Login);
}

#[test]
fn explorer_completes_the_flow_once() {
    let mut env = WebFlowEnv::with_config(reliable(), Persona::Explorer, Some(1));
    let t = env.step(CLICK_LOGIN).unwrap();
    assert_eq!(t.reward, 3.0);
    let t = env.step(SAVE_PROFILE).unwrap();
    assert_eq!(t.reward, 13.0);
    assert!(t.terminated);
    assert!(!t.truncated);
    assert_eq!(t.obs[..3], [0.0, 0.0, 1.0]);
    assert_eq!(
        env.snapshot(),
        Snapshot::WebFlow { ticks: 2, page: Page::Done, has_error: false }
    );

    // Done is absorbing, even for the reset form action.
    assert_eq!(env.step(RESET_FORM), Err(EnvError::EpisodeFinished));
    assert_eq!(env.page(), Page::Done);
}

#[test]
fn pages_count_as_new_only_once_per_episode() {
    let mut env = WebFlowEnv::with_config(reliable(), Persona::Explorer, Some(1));
    assert_eq!(env.step(CLICK_LOGIN).unwrap().reward, 3.0);
    assert_eq!(env.step(RESET_FORM).unwrap().reward, 0.0);
    assert_eq!(env.step(CLICK_LOGIN).unwrap().reward, 0.0);

    env.reset(None);
    assert_eq!(env.step(CLICK_LOGIN).unwrap().reward, 3.0);
}

#[test]
fn survivor_does_not_track_visits() {
    let mut env = WebFlowEnv::with_config(reliable(), Persona::Survivor, Some(1));
    env.step(CLICK_LOGIN).unwrap();
    assert_eq!(env.visited_pages().len(), 1);
}

#[test]
fn truncates_after_50_ticks() {
    let mut env = WebFlowEnv::new(Persona::Explorer, Some(4));
    for tick in 1..=50 {
        let t = env.step(0).unwrap();
        assert!(!t.terminated);
        assert_eq!(t.truncated, tick == 50);
    }
    assert_eq!(env.ticks(), 50);
    assert_eq!(env.step(0), Err(EnvError::EpisodeFinished));
}

#[test]
fn random_play_never_exceeds_tick_limit() {
    let mut rng = fastrand::Rng::with_seed(31);
    let mut env = WebFlowEnv::new(Persona::Survivor, Some(31));
    for _ in 0..100 {
        env.reset(None);
        let mut ticks = 0;
        loop {
            let t = env.step(rng.usize(0..7)).unwrap();
            ticks += 1;
            assert!(env.observation_bounds().contains(&t.obs));
            if t.is_done() {
                break;
            }
        }
        assert!(ticks <= 50);
    }
}

#[test]
fn rejects_out_of_range_action() {
    let mut env = WebFlowEnv::new(Persona::Explorer, Some(0));
    assert_eq!(env.step(7), Err(EnvError::InvalidAction { action: 7, action_size: 7 }));
    assert_eq!(env.ticks(), 0);
}
