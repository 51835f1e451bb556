#[cfg(test)]
mod args_tests {
    use crate::{parse_hex_address, Args};
    use clap::Parser;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn log_level_defaults_to_info() {
        let args = Args::try_parse_from(["nes_test", "game.nes"]).unwrap();

        assert_eq!(args.log_level, LevelFilter::INFO);
        assert!(!args.trace);
        assert_eq!(args.frames, None);
    }

    #[test]
    fn log_level_from_command_line() {
        let args =
            Args::try_parse_from(["nes_test", "game.nes", "--log-level", "debug"]).unwrap();
        assert_eq!(args.log_level, LevelFilter::DEBUG);

        let args = Args::try_parse_from(["nes_test", "game.nes", "--log-level", "off"]).unwrap();
        assert_eq!(args.log_level, LevelFilter::OFF);

        assert!(Args::try_parse_from(["nes_test", "game.nes", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn start_pc_is_hex() {
        let args =
            Args::try_parse_from(["nes_test", "nestest.nes", "--start-pc", "C000", "--trace"])
                .unwrap();

        assert_eq!(args.start_pc, Some(0xC000));
        assert!(args.trace);

        assert_eq!(parse_hex_address("$8000"), Ok(0x8000));
        assert_eq!(parse_hex_address("0xfffc"), Ok(0xFFFC));
        assert!(parse_hex_address("10000").is_err());
    }
}
