mod tests {
    use embassy_time::{Duration, Instant};
    use rgbw_strip_engine::color::{BLACK, GradientConfig, GradientMode, Rgbw, rgbw};
    use rgbw_strip_engine::effect::{ColorParams, EffectId};
    use rgbw_strip_engine::intent_processor::{
        IntentChannel, LightChangeIntent, LightStateIntent, TrySendError,
    };
    use rgbw_strip_engine::pixels::{EnableMask, PixelBuffer};
    use rgbw_strip_engine::renderer::{LightEngineConfig, OutputGate, Renderer, compose};
    use rgbw_strip_engine::transition::Fade;

    const RED: Rgbw = rgbw(255, 0, 0, 0);

    fn red_config() -> LightEngineConfig {
        LightEngineConfig {
            color: ColorParams {
                red: 255,
                ..ColorParams::default()
            },
            ..LightEngineConfig::default()
        }
    }

    fn render_until<const N: usize>(renderer: &mut Renderer<'_, N, 4>, from_ms: u64, to_ms: u64) {
        for ms in from_ms..to_ms {
            renderer.render(Instant::from_millis(ms));
        }
    }

    #[test]
    fn test_compose_mask_wins() {
        let mut pixels = PixelBuffer::<4>::new();
        pixels.fill(RED);
        let mut mask = EnableMask::<4>::new();
        mask.write_hex("E").unwrap();
        let mut frame = [BLACK; 4];

        compose(&mut frame, &pixels, &mask, OutputGate::On);
        assert_eq!(frame, [RED, RED, RED, BLACK]);

        compose(&mut frame, &pixels, &mask, OutputGate::Blend(255));
        assert_eq!(frame, [RED, RED, RED, BLACK]);

        compose(&mut frame, &pixels, &mask, OutputGate::Blend(128));
        assert_eq!(frame[0], rgbw(128, 0, 0, 0));
        assert_eq!(frame[3], BLACK);

        compose(&mut frame, &pixels, &mask, OutputGate::Off);
        assert_eq!(frame, [BLACK; 4]);
    }

    #[test]
    fn test_render_powered_on() {
        let channel = IntentChannel::<4>::new();
        let mut renderer = Renderer::<4, 4>::new(
            channel.receiver(),
            &red_config(),
            Instant::from_millis(0),
        );

        assert_eq!(renderer.render(Instant::from_millis(0)), &[RED; 4]);
        assert_eq!(renderer.frame(), &[RED; 4]);
        assert!(!renderer.take_changed());
    }

    #[test]
    fn test_intent_fields_apply_in_order() {
        let channel = IntentChannel::<4>::new();
        let mut renderer = Renderer::<4, 4>::new(
            channel.receiver(),
            &LightEngineConfig::default(),
            Instant::from_millis(0),
        );

        // Color lands before the effect, so the color loop survives
        let intent = LightStateIntent {
            red: Some(255),
            effect: Some(EffectId::ColorLoop),
            ..LightStateIntent::default()
        };
        channel
            .sender()
            .try_send(LightChangeIntent::State(intent))
            .unwrap();
        renderer.render(Instant::from_millis(10));

        assert!(renderer.take_changed());
        assert!(!renderer.take_changed());
        assert_eq!(renderer.engine().effect_id(), EffectId::ColorLoop);
        assert_eq!(
            renderer.snapshot().encode_state().as_str(),
            "ON,1,255,0,0,0,255,colorloop"
        );
    }

    #[test]
    fn test_power_off_fades_then_stops() {
        let channel = IntentChannel::<4>::new();
        let config = LightEngineConfig {
            effect: EffectId::Sunrise,
            ..LightEngineConfig::default()
        };
        let mut renderer = Renderer::<8, 4>::new(
            channel.receiver(),
            &config,
            Instant::from_millis(0),
        );
        assert_eq!(renderer.timers().len(), 3);

        renderer.apply(
            LightChangeIntent::State(LightStateIntent {
                power: Some(false),
                transition: Some(1),
                ..LightStateIntent::default()
            }),
            Instant::from_millis(0),
        );
        assert!(!renderer.is_on());
        assert!(renderer.transition().is_active());
        assert_eq!(renderer.transition().direction(), Fade::Out);
        assert!(!renderer.engine().is_stopped());

        render_until(&mut renderer, 1, 400);

        assert!(!renderer.transition().is_active());
        assert!(renderer.engine().is_stopped());
        assert!(renderer.timers().is_empty());
        assert_eq!(renderer.frame(), &[BLACK; 8]);
    }

    #[test]
    fn test_power_off_before_first_fade_step_stops_engine() {
        let channel = IntentChannel::<4>::new();
        let config = LightEngineConfig {
            power: false,
            effect: EffectId::Sunrise,
            ..LightEngineConfig::default()
        };
        let mut renderer = Renderer::<8, 4>::new(
            channel.receiver(),
            &config,
            Instant::from_millis(0),
        );
        let power = |on| {
            LightChangeIntent::State(LightStateIntent {
                power: Some(on),
                ..LightStateIntent::default()
            })
        };

        renderer.apply(power(true), Instant::from_millis(0));
        assert_eq!(renderer.timers().len(), 4);
        renderer.apply(power(false), Instant::from_millis(0));

        assert!(!renderer.transition().is_active());
        assert!(renderer.engine().is_stopped());
        assert!(renderer.timers().is_empty());

        render_until(&mut renderer, 1, 2000);
        assert!(renderer.engine().is_stopped());
        assert!(renderer.timers().is_empty());
        assert_eq!(renderer.frame(), &[BLACK; 8]);

        // Next power-on restarts the sunrise from the beginning
        renderer.apply(power(true), Instant::from_millis(2000));
        let phase = renderer.engine().effect().sunrise().map(|sunrise| sunrise.phase());
        assert_eq!(phase, Some(1));
        assert_eq!(renderer.timers().len(), 4);
    }

    #[test]
    fn test_power_on_fades_in() {
        let channel = IntentChannel::<4>::new();
        let config = LightEngineConfig {
            power: false,
            ..red_config()
        };
        let mut renderer = Renderer::<4, 4>::new(
            channel.receiver(),
            &config,
            Instant::from_millis(0),
        );
        assert_eq!(renderer.render(Instant::from_millis(0)), &[BLACK; 4]);

        let intent = LightStateIntent {
            power: Some(true),
            transition: Some(2),
            ..LightStateIntent::default()
        };
        renderer.apply(LightChangeIntent::State(intent), Instant::from_millis(0));
        assert_eq!(renderer.transition().direction(), Fade::In);
        assert_eq!(renderer.transition_duration(), 2);

        render_until(&mut renderer, 1, 1000);
        let midway = renderer.frame()[0];
        assert!(midway.r > 0 && midway.r < 255);

        render_until(&mut renderer, 1000, 3000);
        assert_eq!(renderer.frame(), &[RED; 4]);
        assert!(!renderer.engine().is_stopped());
    }

    #[test]
    fn test_transition_with_parameters_fades_in() {
        let channel = IntentChannel::<4>::new();
        let mut renderer = Renderer::<4, 4>::new(
            channel.receiver(),
            &red_config(),
            Instant::from_millis(0),
        );

        let without_params = LightStateIntent {
            transition: Some(3),
            ..LightStateIntent::default()
        };
        renderer.apply(LightChangeIntent::State(without_params), Instant::from_millis(0));
        assert!(!renderer.transition().is_active());

        let with_params = LightStateIntent {
            transition: Some(3),
            blue: Some(255),
            ..LightStateIntent::default()
        };
        renderer.apply(LightChangeIntent::State(with_params), Instant::from_millis(0));
        assert!(renderer.transition().is_active());
        assert_eq!(renderer.transition().direction(), Fade::In);
    }

    #[test]
    fn test_wake_alarm_powers_on() {
        let channel = IntentChannel::<4>::new();
        let config = LightEngineConfig {
            power: false,
            ..LightEngineConfig::default()
        };
        let mut renderer = Renderer::<16, 4>::new(
            channel.receiver(),
            &config,
            Instant::from_millis(0),
        );
        assert!(renderer.timers().is_empty());

        channel
            .sender()
            .try_send(LightChangeIntent::WakeAlarm(600))
            .unwrap();
        renderer.render(Instant::from_millis(5));

        assert!(renderer.is_on());
        assert_eq!(renderer.engine().effect_id(), EffectId::Sunrise);
        assert_eq!(renderer.engine().sunrise_duration(), 600);
        assert_eq!(renderer.transition().direction(), Fade::In);
        assert_eq!(renderer.timers().len(), 4);
    }

    #[test]
    fn test_effect_change_while_off_waits_for_power() {
        let channel = IntentChannel::<4>::new();
        let config = LightEngineConfig {
            power: false,
            ..LightEngineConfig::default()
        };
        let mut renderer = Renderer::<16, 4>::new(
            channel.receiver(),
            &config,
            Instant::from_millis(0),
        );

        let intent = LightStateIntent {
            effect: Some(EffectId::Sunrise),
            ..LightStateIntent::default()
        };
        renderer.apply(LightChangeIntent::State(intent), Instant::from_millis(0));
        assert_eq!(renderer.engine().effect_id(), EffectId::Sunrise);
        assert!(renderer.timers().is_empty());

        let intent = LightStateIntent {
            power: Some(true),
            ..LightStateIntent::default()
        };
        renderer.apply(LightChangeIntent::State(intent), Instant::from_millis(0));
        assert_eq!(renderer.timers().len(), 4);
    }

    #[test]
    fn test_gradient_intent() {
        let channel = IntentChannel::<4>::new();
        let mut renderer = Renderer::<8, 4>::new(
            channel.receiver(),
            &LightEngineConfig::default(),
            Instant::from_millis(0),
        );
        assert_eq!(renderer.attributes().encode().as_str(), "8,N,50");

        renderer.apply(
            LightChangeIntent::Gradient { mode: 'X', extent: 30 },
            Instant::from_millis(0),
        );
        renderer.apply(
            LightChangeIntent::Gradient { mode: 'E', extent: 101 },
            Instant::from_millis(0),
        );
        assert!(!renderer.take_changed());
        assert_eq!(
            renderer.attributes().gradient,
            GradientConfig::default()
        );

        renderer.apply(
            LightChangeIntent::Gradient { mode: 'E', extent: 30 },
            Instant::from_millis(0),
        );
        assert!(renderer.take_changed());
        assert_eq!(renderer.attributes().gradient.mode, GradientMode::Edges);
        assert_eq!(renderer.attributes().encode().as_str(), "8,E,30");
    }

    #[test]
    fn test_custom_and_mask_intents() {
        let channel = IntentChannel::<4>::new();
        let config = LightEngineConfig {
            effect: EffectId::Custom,
            ..LightEngineConfig::default()
        };
        let mut renderer = Renderer::<4, 4>::new(
            channel.receiver(),
            &config,
            Instant::from_millis(0),
        );
        let sender = channel.sender();

        sender
            .try_send(LightChangeIntent::custom_pixels("FF000000FF0000").unwrap())
            .unwrap();
        sender
            .try_send(LightChangeIntent::enabled_mask("A").unwrap())
            .unwrap();
        sender
            .try_send(LightChangeIntent::custom_pixels("not hex").unwrap())
            .unwrap();

        let frame = renderer.render(Instant::from_millis(1));
        assert_eq!(frame, &[RED, BLACK, BLACK, BLACK]);
        assert_eq!(renderer.engine().custom().get(1), Some(rgbw(0, 255, 0, 0)));
    }

    #[test]
    fn test_channel_full() {
        let channel = IntentChannel::<1>::new();
        let sender = channel.sender();
        let intent = LightChangeIntent::WakeAlarm(10);

        assert_eq!(sender.try_send(intent.clone()), Ok(()));
        assert_eq!(sender.try_send(intent.clone()), Err(TrySendError(intent.clone())));
        assert_eq!(channel.receiver().try_receive(), Ok(intent));
        assert!(channel.receiver().try_receive().is_err());
    }

    #[test]
    fn test_hex_payload_capacity() {
        let long = "0".repeat(2000);
        assert!(LightChangeIntent::custom_pixels(&long).is_none());
        assert!(LightChangeIntent::enabled_mask("F0").is_some());
    }

    #[test]
    fn test_default_config() {
        let config = LightEngineConfig::default();
        assert!(config.power);
        assert_eq!(config.effect, EffectId::Stable);
        assert_eq!(config.transition, 1);
        assert_eq!(config.color.brightness, 255);
        assert_eq!(config.gradient.extent, 50);
        assert_eq!(config.sunrise.sun_size_percent, 25);
        assert_eq!(config.color_loop_cycle, Duration::from_secs(10));
    }
}
