mod tests {
    use std::collections::{BTreeSet, HashSet};

    use embassy_time::{Duration, Instant};
    use myrtio_light_scene::{
        ControlReading, Controls, Light, ModeFilter, ModeId, ModeSlot, OutputDriver, Scene,
        SceneConfig, SceneError, TransitionCurve,
        color::{BLACK, NAMED_RAINBOW, NIGHT, ROYGBIV, Rgb, will_produce_white},
        color_maker::MAX_AMBIENT_COLORS,
        mode::{
            BUG_COLOR, FIRE_MAX_FADE, LIGHTNING_BUGS_EXIT_FADE, LightningBugsMode, SEGMENT_LENGTH,
        },
    };
    use rand::{SeedableRng, rngs::SmallRng};

    const FRAME_MS: u64 = 16;

    #[derive(Default)]
    struct RecordingOutput {
        frames: usize,
        last: Vec<Rgb>,
    }

    impl OutputDriver for RecordingOutput {
        fn write(&mut self, colors: &[Rgb]) {
            self.frames += 1;
            self.last = colors.to_vec();
        }
    }

    #[derive(Default)]
    struct TestControls {
        reading: ControlReading,
    }

    impl Controls for TestControls {
        fn read(&mut self) -> ControlReading {
            self.reading
        }
    }

    type TestScene = Scene<RecordingOutput, TestControls, SmallRng, 64>;

    fn build(config: &SceneConfig, controls: TestControls, seed: u64) -> TestScene {
        Scene::new(
            config,
            RecordingOutput::default(),
            controls,
            SmallRng::seed_from_u64(seed),
            Instant::from_millis(0),
        )
        .expect("scene")
    }

    fn scene(pixels: usize, seed: u64) -> TestScene {
        build(&SceneConfig::new(pixels), TestControls::default(), seed)
    }

    /// Tick `frames` times at 16 ms, starting one frame after `start`
    fn run(scene: &mut TestScene, start: u64, frames: u64) -> u64 {
        let mut now = start;
        for _ in 0..frames {
            now += FRAME_MS;
            scene.tick(Instant::from_millis(now));
        }
        now
    }

    fn assert_transitions_bounded(scene: &TestScene, max: Duration) {
        for (i, light) in scene.lights().iter().enumerate() {
            if !light.is_transitioning() {
                continue;
            }
            let age = scene
                .clock()
                .saturating_duration_since(light.transition_start());
            assert!(light.transition_duration() <= max, "light {i}");
            assert!(age <= light.transition_duration(), "light {i} overran");
        }
    }

    #[test]
    fn test_new_rejects_bad_pixel_counts() {
        let err = Scene::<RecordingOutput, TestControls, SmallRng, 64>::new(
            &SceneConfig::new(0),
            RecordingOutput::default(),
            TestControls::default(),
            SmallRng::seed_from_u64(0),
            Instant::from_millis(0),
        )
        .err();
        assert_eq!(err, Some(SceneError::EmptyStrand));

        let err = Scene::<RecordingOutput, TestControls, SmallRng, 64>::new(
            &SceneConfig::new(100),
            RecordingOutput::default(),
            TestControls::default(),
            SmallRng::seed_from_u64(0),
            Instant::from_millis(0),
        )
        .err();
        assert_eq!(
            err,
            Some(SceneError::CapacityExceeded {
                requested: 100,
                capacity: 64
            })
        );
    }

    #[test]
    fn test_first_tick_enters_a_mode() {
        let mut scene = scene(30, 1);
        assert_eq!(scene.mode(), None);
        assert!(matches!(scene.slot(), ModeSlot::Off));

        run(&mut scene, 0, 1);
        let mode = scene.mode().expect("mode entered");
        assert_ne!(mode, ModeId::LightningBugs);
        assert_eq!(scene.output().frames, 1);
        assert_eq!(scene.output().last.len(), 30);
    }

    #[test]
    fn test_first_tick_enters_test_mode() {
        let mut config = SceneConfig::new(30);
        config.test_mode = Some(ModeId::Rainbow);
        let mut scene = build(&config, TestControls::default(), 2);
        run(&mut scene, 0, 1);
        assert_eq!(scene.mode(), Some(ModeId::Rainbow));
    }

    #[test]
    fn test_fire_sixty_pixels() {
        let mut scene = scene(60, 3);
        scene.set_mode(ModeId::Fire);

        let mut now = 0;
        for _ in 0..100 {
            now = run(&mut scene, now, 1);
            assert_transitions_bounded(&scene, FIRE_MAX_FADE);
        }

        assert_eq!(scene.mode(), Some(ModeId::Fire));
        assert_eq!(scene.output().frames, 100);
        assert_eq!(scene.frame().len(), 60);
        assert!(scene.colors().any(|c| c != BLACK));
    }

    #[test]
    fn test_parity_ten_pixels() {
        let mut scene = scene(10, 4);
        scene.set_mode(ModeId::Parity);
        run(&mut scene, 0, 1);

        let even = scene.lights()[0].target_color().expect("even transitioning");
        let odd = scene.lights()[1].target_color().expect("odd transitioning");
        assert_ne!(even, odd);
        assert!(NAMED_RAINBOW.colors().contains(&even));
        assert!(NAMED_RAINBOW.colors().contains(&odd));
        for (i, light) in scene.lights().iter().enumerate() {
            let expected = if i % 2 == 0 { even } else { odd };
            assert_eq!(light.target_color(), Some(expected), "light {i}");
        }

        let mut now = FRAME_MS;
        let mut rounds = BTreeSet::new();
        for _ in 0..1000 {
            now = run(&mut scene, now, 1);
            for light in scene.lights() {
                if let Some(target) = light.target_color() {
                    assert!(!will_produce_white(light.original_color(), target));
                    rounds.insert(light.transition_start());
                }
            }
        }
        assert!(rounds.len() > 3, "parity stalled");
    }

    #[test]
    fn test_cycling_modes_keeps_scratch_bounded() {
        let mut scene = scene(64, 5);
        let mut now = 0;
        for _ in 0..5 {
            for mode in ModeId::ALL {
                scene.set_mode(mode);
                assert_eq!(scene.mode(), Some(mode));
                now = run(&mut scene, now, 20);
                assert!(scene.scratch_buffers() <= 2);
                assert!(scene.ambient_color_count() <= MAX_AMBIENT_COLORS);
                assert_eq!(scene.ambient_color_count(), mode.ambient_colors(64).0);
                assert!(
                    scene
                        .lights()
                        .iter()
                        .all(|light| light.mode_state <= 2)
                );
            }
        }

        scene.set_mode(ModeId::Fire);
        assert_eq!(scene.scratch_buffers(), 0);
        assert_eq!(scene.ambient_color_count(), 0);
    }

    #[test]
    fn test_set_mode_same_mode_is_noop() {
        let mut scene = scene(40, 6);
        scene.set_mode(ModeId::Waves);
        run(&mut scene, 0, 3);
        let leader = scene.follow_leader();
        assert!(leader.fract() != 0.0);

        scene.set_mode(ModeId::Waves);
        assert_eq!(scene.follow_leader(), leader);
    }

    #[test]
    fn test_set_mode_reseeds_follow_leader() {
        let mut scene = scene(40, 7);
        scene.set_mode(ModeId::Waves);
        run(&mut scene, 0, 3);

        scene.set_mode(ModeId::Rainbow);
        let leader = scene.follow_leader();
        assert_eq!(leader.fract(), 0.0);
        assert!(leader < 40.0);
    }

    #[test]
    fn test_follow_leader_stays_on_strand() {
        let mut scene = scene(12, 8);
        scene.set_mode(ModeId::Rainbow);
        let mut now = 0;
        for _ in 0..500 {
            now = run(&mut scene, now, 1);
            let leader = scene.follow_leader();
            assert!((0.0..12.0).contains(&leader), "leader {leader}");
        }
    }

    #[test]
    fn test_leaving_lightning_bugs_fades_to_night() {
        let mut scene = scene(20, 9);
        scene.set_mode(ModeId::LightningBugs);
        for light in scene.lights() {
            assert_eq!(light.target_color(), Some(NIGHT));
        }
        run(&mut scene, 0, 200);

        scene.set_mode(ModeId::Fire);
        for light in scene.lights() {
            assert_eq!(light.target_color(), Some(NIGHT));
            assert_eq!(light.transition_duration(), LIGHTNING_BUGS_EXIT_FADE);
            assert_eq!(light.mode_state, 0);
        }
    }

    #[test]
    fn test_test_mode_disables_rotation() {
        let mut config = SceneConfig::new(20);
        config.test_mode = Some(ModeId::Twinkle);
        config.rotation_interval = Duration::from_millis(100);
        let mut scene = build(&config, TestControls::default(), 10);
        run(&mut scene, 0, 50);
        assert_eq!(scene.mode(), Some(ModeId::Twinkle));
    }

    #[test]
    fn test_rotation_switches_modes() {
        let mut config = SceneConfig::new(20);
        config.rotation_interval = Duration::from_millis(100);
        let mut scene = build(&config, TestControls::default(), 11);

        let mut seen = HashSet::new();
        let mut now = 0;
        for _ in 0..100 {
            now = run(&mut scene, now, 1);
            seen.insert(scene.mode().expect("mode"));
        }
        assert!(seen.len() > 2);
        assert!(!seen.contains(&ModeId::LightningBugs));
    }

    #[test]
    fn test_advance_button_edges() {
        let mut config = SceneConfig::new(20);
        config.test_mode = Some(ModeId::Waves);
        let controls = TestControls {
            reading: ControlReading {
                advance_pressed: true,
                ..ControlReading::default()
            },
        };
        let mut scene = build(&config, controls, 12);

        // Held from power-up: ignored
        let mut now = run(&mut scene, 0, 2);
        assert_eq!(scene.mode(), Some(ModeId::Waves));

        scene.controls_mut().reading.advance_pressed = false;
        now = run(&mut scene, now, 1);
        scene.controls_mut().reading.advance_pressed = true;
        now = run(&mut scene, now, 1);
        assert_eq!(scene.mode(), Some(ModeId::OneBigWave));

        // Still held: no repeat
        now = run(&mut scene, now, 5);
        assert_eq!(scene.mode(), Some(ModeId::OneBigWave));

        scene.controls_mut().reading.advance_pressed = false;
        now = run(&mut scene, now, 1);
        scene.controls_mut().reading.advance_pressed = true;
        run(&mut scene, now, 1);
        assert_eq!(scene.mode(), Some(ModeId::Fire));
    }

    #[test]
    fn test_speed_change_forces_in_band_mode() {
        let mut config = SceneConfig::new(30);
        config.mode_filter = ModeFilter::SpeedBands;
        let mut scene = build(&config, TestControls::default(), 13);
        scene.set_mode(ModeId::Fire);
        let mut now = run(&mut scene, 0, 2);
        assert_eq!(scene.mode(), Some(ModeId::Fire));

        // Small wobble is ignored
        scene.controls_mut().reading.speed = 1.05;
        now = run(&mut scene, now, 2);
        assert_eq!(scene.speed(), 1.0);
        assert_eq!(scene.mode(), Some(ModeId::Fire));

        scene.controls_mut().reading.speed = 2.5;
        run(&mut scene, now, 1);
        assert_eq!(scene.speed(), 2.5);
        let mode = scene.mode().expect("mode");
        assert!(mode.speed_range().contains(2.5), "{mode:?}");
    }

    #[test]
    fn test_pinned_mode_ignores_speed_band() {
        let mut config = SceneConfig::new(30);
        config.test_mode = Some(ModeId::Fire);
        let mut scene = build(&config, TestControls::default(), 14);
        let now = run(&mut scene, 0, 1);

        scene.controls_mut().reading.speed = 2.5;
        run(&mut scene, now, 1);
        assert_eq!(scene.speed(), 2.5);
        assert_eq!(scene.mode(), Some(ModeId::Fire));
    }

    #[test]
    fn test_speed_is_clamped() {
        let controls = TestControls {
            reading: ControlReading {
                speed: 9.0,
                ..ControlReading::default()
            },
        };
        let scene = build(&SceneConfig::new(10), controls, 15);
        assert_eq!(scene.speed(), 3.0);
    }

    #[test]
    fn test_scene_clock_runs_at_speed() {
        let controls = TestControls {
            reading: ControlReading {
                speed: 2.0,
                ..ControlReading::default()
            },
        };
        let mut scene = build(&SceneConfig::new(10), controls, 16);
        scene.set_mode(ModeId::BoomResponder);

        // Same instant as construction still counts one millisecond
        scene.tick(Instant::from_millis(0));
        assert_eq!(scene.clock().as_millis(), 2);

        scene.tick(Instant::from_millis(100));
        assert_eq!(scene.clock().as_millis(), 202);
    }

    #[test]
    fn test_power_switch_fades_out_and_resumes() {
        let mut scene = scene(16, 17);
        scene.set_mode(ModeId::BoomResponder);
        let mut now = run(&mut scene, 0, 100);
        assert!(scene.output().last.iter().any(|c| *c != BLACK));

        scene.controls_mut().reading.power = false;
        now = run(&mut scene, now, 1);
        assert!(!scene.is_powered());
        for light in scene.lights() {
            assert_eq!(light.target_color(), Some(BLACK));
        }

        now = run(&mut scene, now, 70);
        assert!(scene.lights().iter().all(|light| !light.is_transitioning()));
        assert!(scene.output().last.iter().all(|c| *c == BLACK));
        assert_eq!(scene.mode(), Some(ModeId::BoomResponder));

        scene.controls_mut().reading.power = true;
        run(&mut scene, now, 1);
        assert!(scene.is_powered());
        assert!(scene.lights().iter().any(Light::is_transitioning));
    }

    #[test]
    fn test_twinkle_never_darkens_whole_segment() {
        let mut scene = scene(20, 18);
        scene.set_mode(ModeId::Twinkle);
        let mut now = 0;
        for _ in 0..2000 {
            now = run(&mut scene, now, 1);
            let settled: Vec<Rgb> = scene.lights()[..SEGMENT_LENGTH]
                .iter()
                .map(|light| light.target_color().unwrap_or_else(|| light.color()))
                .collect();
            assert!(settled.iter().any(|c| *c != BLACK));
        }
    }

    #[test]
    fn test_twinkle_repeats_segment() {
        let mut scene = scene(20, 19);
        scene.set_mode(ModeId::Twinkle);
        // Entry fade, then enough rounds for every position to change
        run(&mut scene, 0, 3000);

        let lights = scene.lights();
        for (i, light) in lights.iter().enumerate().skip(SEGMENT_LENGTH) {
            let base = &lights[i % SEGMENT_LENGTH];
            if light.transition_start() == base.transition_start()
                && light.transition_start() > Instant::from_millis(1000)
            {
                assert_eq!(
                    light.target_color().unwrap_or_else(|| light.color()),
                    base.target_color().unwrap_or_else(|| base.color()),
                    "light {i}"
                );
            }
        }
    }

    #[test]
    fn test_bounce_reaches_both_ends() {
        let mut scene = scene(10, 20);
        scene.set_mode(ModeId::Bounce);
        let mut visited = HashSet::new();
        let mut now = 0;
        for _ in 0..300 {
            now = run(&mut scene, now, 1);
            let ModeSlot::Bounce(bounce) = scene.slot() else {
                panic!("bounce slot expected");
            };
            assert!(bounce.position() < 10);
            visited.insert(bounce.position());
        }
        assert!(visited.contains(&0));
        assert!(visited.contains(&9));
    }

    #[test]
    fn test_accumulator_first_ping_lights_three_pixels() {
        let mut scene = scene(30, 21);
        scene.set_mode(ModeId::Accumulator);
        run(&mut scene, 0, 1);

        let lit: Vec<usize> = scene
            .lights()
            .iter()
            .enumerate()
            .filter(|(_, light)| light.is_transitioning())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit.len(), 3);
        let target = scene.lights()[lit[0]].target_color();
        assert!(lit.iter().all(|i| scene.lights()[*i].target_color() == target));
    }

    #[test]
    fn test_interfering_waves_paint_directly() {
        let mut scene = scene(60, 22);
        scene.set_mode(ModeId::InterferingWaves);
        assert_eq!(scene.ambient_color_count(), 3);
        assert_eq!(scene.scratch_buffers(), 2);

        run(&mut scene, 0, 250);
        assert!(scene.lights().iter().all(|light| !light.is_transitioning()));
        assert!(scene.colors().any(|c| c != BLACK));
    }

    #[test]
    fn test_waves_light_ambient_color() {
        let mut scene = scene(60, 23);
        scene.set_mode(ModeId::OneBigWave);
        run(&mut scene, 0, 200);
        assert!(scene.colors().any(|c| c != BLACK));
    }

    #[test]
    fn test_waves_short_strand_keeps_dark_band() {
        let mut scene = scene(10, 0);
        scene.set_mode(ModeId::Waves);

        let mut now = 0;
        for frame in 0..2000 {
            now = run(&mut scene, now, 1);
            if frame < 500 {
                continue;
            }
            let dark = scene
                .lights()
                .iter()
                .filter(|light| match light.target_color() {
                    Some(target) => target == BLACK,
                    None => light.color() == BLACK,
                })
                .count();
            assert!(dark > 0, "strand fully lit at frame {frame}");
            assert!(dark < 10, "strand fully dark at frame {frame}");
        }
    }

    #[test]
    fn test_ignition_odds_follow_dusk_swing() {
        let odds = |secs| LightningBugsMode::ignition_odds(Duration::from_secs(secs));
        assert_eq!(odds(0), 1400);
        // Fewest flashes a quarter period in, most at three quarters
        assert!((2399..=2400).contains(&odds(15)), "{}", odds(15));
        assert!((399..=401).contains(&odds(45)), "{}", odds(45));
        assert!(odds(15) > odds(30) && odds(30) > odds(45));
        assert_eq!(odds(60), odds(0));
    }

    #[test]
    fn test_lightning_bugs_cycle() {
        const LIT: u8 = 1;
        const DARK: u8 = 2;
        const RESTING: u8 = 0;

        let mut scene = scene(64, 24);
        scene.set_mode(ModeId::LightningBugs);
        let mut seen: Vec<(u8, Instant)> = scene
            .lights()
            .iter()
            .map(|light| (light.mode_state, light.transition_start()))
            .collect();

        let mut cycles = 0;
        let mut now = 0;
        for _ in 0..3000 {
            now = run(&mut scene, now, 1);
            for (i, light) in scene.lights().iter().enumerate() {
                let (prev_state, prev_start) = seen[i];
                if light.transition_start() == prev_start {
                    assert_eq!(light.mode_state, prev_state, "light {i}");
                    continue;
                }
                let target = light.target_color();
                let duration = light.transition_duration().as_millis();
                match light.mode_state {
                    LIT => {
                        assert_eq!(prev_state, RESTING, "light {i}");
                        assert_eq!(target, Some(BUG_COLOR));
                        assert_eq!(duration, 350);
                    }
                    DARK => {
                        assert_eq!(prev_state, LIT, "light {i}");
                        assert_eq!(light.original_color(), BUG_COLOR);
                        assert_eq!(target, Some(BLACK));
                        assert_eq!(duration, 450);
                        assert_eq!(light.transition_curve(), TransitionCurve::EaseInOut);
                    }
                    RESTING => {
                        assert_eq!(prev_state, DARK, "light {i}");
                        assert_eq!(light.original_color(), BLACK);
                        assert_eq!(target, Some(NIGHT));
                        assert_eq!(duration, 450);
                        cycles += 1;
                    }
                    state => panic!("light {i} in unknown state {state}"),
                }
                seen[i] = (light.mode_state, light.transition_start());
            }
        }
        assert!(cycles > 5, "only {cycles} full cycles");
    }

    #[test]
    fn test_boom_responder_refills_idle_lights() {
        let mut scene = scene(10, 25);
        scene.set_mode(ModeId::BoomResponder);
        let mut now = run(&mut scene, 0, 1);

        let first: Vec<Rgb> = scene
            .lights()
            .iter()
            .map(|light| light.target_color().expect("every light fading"))
            .collect();
        assert!(first.iter().all(|c| NAMED_RAINBOW.colors().contains(c)));
        assert!(
            scene
                .lights()
                .iter()
                .all(|light| light.transition_duration().as_millis() == 1000)
        );

        // One second of fade, then every light gets a fresh target
        now = run(&mut scene, now, 63);
        run(&mut scene, now, 1);
        for (i, light) in scene.lights().iter().enumerate() {
            assert!(light.is_transitioning(), "light {i}");
            assert!(light.transition_start() > Instant::from_millis(16));
            assert_eq!(light.original_color(), first[i]);
            let target = light.target_color().expect("fading");
            assert!(NAMED_RAINBOW.colors().contains(&target));
        }
    }

    #[test]
    fn test_rainbow_shifts_once_per_lap() {
        let mut scene = scene(12, 26);
        scene.set_mode(ModeId::Rainbow);
        let ModeSlot::Rainbow(rainbow) = scene.slot() else {
            panic!("rainbow slot expected");
        };
        let mut expected = rainbow.color_index();

        let mut laps = 0;
        let mut last: Option<usize> = None;
        let mut now = 0;
        for _ in 0..1000 {
            now = run(&mut scene, now, 1);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leader = (scene.follow_leader() as usize).min(11);
            if let Some(last) = last {
                let lapped = if scene.is_reversed() {
                    leader > last
                } else {
                    leader < last
                };
                if lapped {
                    laps += 1;
                    expected = (expected + 1) % ROYGBIV.len();
                }
            }
            last = Some(leader);

            let ModeSlot::Rainbow(rainbow) = scene.slot() else {
                panic!("rainbow slot expected");
            };
            assert_eq!(rainbow.color_index(), expected);
        }
        assert!(laps >= 5, "only {laps} laps");
    }
}
