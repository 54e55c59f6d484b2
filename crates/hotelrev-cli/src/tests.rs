use super::*;

const HOTEL_URL: &str = "https://www.tripadvisor.com/Hotel_Review-g1-d2-Reviews-Grand_Hotel.html";
const REGION_URL: &str = "https://www.tripadvisor.com/Hotels-g189158-Lisbon-Hotels.html";

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["hotelrev-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["hotelrev-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["hotelrev-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn scrape_hotel_defaults() {
    let cli = Cli::try_parse_from(["hotelrev-cli", "scrape", "hotel", HOTEL_URL]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            command: ScrapeCommands::Hotel {
                ref url,
                max_pages: None,
                fetch: scrape::FetchArgs {
                    browser: false,
                    proxies: false
                }
            }
        }) if url == HOTEL_URL
    ));
}

#[test]
fn scrape_hotel_with_all_flags() {
    let cli = Cli::try_parse_from([
        "hotelrev-cli",
        "scrape",
        "hotel",
        HOTEL_URL,
        "--max-pages",
        "3",
        "--browser",
        "--proxies",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            command: ScrapeCommands::Hotel {
                max_pages: Some(3),
                fetch: scrape::FetchArgs {
                    browser: true,
                    proxies: true
                },
                ..
            }
        })
    ));
}

#[test]
fn scrape_hotel_requires_url() {
    let result = Cli::try_parse_from(["hotelrev-cli", "scrape", "hotel"]);
    assert!(result.is_err());
}

#[test]
fn scrape_region_defaults_to_ten_hotels() {
    let cli = Cli::try_parse_from(["hotelrev-cli", "scrape", "region", REGION_URL]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            command: ScrapeCommands::Region {
                max_hotels: 10,
                max_pages_per_hotel: None,
                ..
            }
        })
    ));
}

#[test]
fn scrape_region_with_limits() {
    let cli = Cli::try_parse_from([
        "hotelrev-cli",
        "scrape",
        "region",
        REGION_URL,
        "--max-hotels",
        "4",
        "--max-pages-per-hotel",
        "2",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            command: ScrapeCommands::Region {
                ref url,
                max_hotels: 4,
                max_pages_per_hotel: Some(2),
                ..
            }
        }) if url == REGION_URL
    ));
}

#[test]
fn hotels_with_location_filter() {
    let cli = Cli::try_parse_from(["hotelrev-cli", "hotels", "--location", "Lisbon"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Hotels { location: Some(ref l) }) if l == "Lisbon"
    ));
}

#[test]
fn reviews_takes_hotel_id() {
    let cli = Cli::try_parse_from(["hotelrev-cli", "reviews", "12"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Reviews { hotel_id: 12 })
    ));
}

#[test]
fn reviews_rejects_non_numeric_id() {
    let result = Cli::try_parse_from(["hotelrev-cli", "reviews", "grand-hotel"]);
    assert!(result.is_err());
}

#[test]
fn export_requires_output() {
    assert!(Cli::try_parse_from(["hotelrev-cli", "export", "3"]).is_err());

    let cli =
        Cli::try_parse_from(["hotelrev-cli", "export", "3", "--output", "out/grand.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export { hotel_id: 3, ref output })
            if output == std::path::Path::new("out/grand.json")
    ));
}

#[test]
fn history_defaults_to_listing_ten() {
    let cli = Cli::try_parse_from(["hotelrev-cli", "history"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::History {
            limit: 10,
            command: None
        })
    ));
}

#[test]
fn history_clear_subcommand() {
    let cli = Cli::try_parse_from(["hotelrev-cli", "history", "clear"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::History {
            command: Some(HistoryCommands::Clear),
            ..
        })
    ));
}

#[test]
fn delete_hotel_uses_kebab_case() {
    let cli = Cli::try_parse_from(["hotelrev-cli", "delete-hotel", "5"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::DeleteHotel { hotel_id: 5 })
    ));
}

#[test]
fn help_is_handled_by_the_parser() {
    let err = Cli::try_parse_from(["hotelrev-cli", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
