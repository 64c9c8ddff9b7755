// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print pretty JSON instead of a table")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print one JSON object per line")
            .action(ArgAction::SetTrue),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("start")
            .long("start")
            .help("Start date (YYYY-MM-DD), inclusive"),
    )
    .arg(
        Arg::new("end")
            .long("end")
            .help("End date (YYYY-MM-DD), inclusive"),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .help("Flow filter: all|cash-in|cash-out")
            .default_value("all"),
    )
    .arg(Arg::new("category").long("category").help("Exact category"))
}

fn cash_cmd() -> Command {
    Command::new("cash")
        .about("Cash ledger: entries, filters, reports, CSV export")
        .subcommand(
            Command::new("add")
                .about("Record a cash entry")
                .arg(Arg::new("date").long("date").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("cash-in|cash-out"),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("method")
                        .long("method")
                        .default_value("cash")
                        .help("cash|card|bank-transfer|check|other"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Cash location slug (meezan|habib|punjab|mcb|home)"),
                )
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("notes").long("notes"))
                .arg(
                    Arg::new("entry-by")
                        .long("entry-by")
                        .required(true)
                        .help("Person making the entry"),
                )
                .arg(
                    Arg::new("added-by")
                        .long("added-by")
                        .default_value("system"),
                )
                .arg(
                    Arg::new("vehicle")
                        .long("vehicle")
                        .help("Related vehicle registration number"),
                )
                .arg(
                    Arg::new("credit")
                        .long("credit")
                        .value_parser(value_parser!(i64))
                        .help("Related credit sale id"),
                ),
        )
        .subcommand(json_flags(range_args(
            Command::new("list")
                .about("List entries, filtered client-side")
                .arg(
                    Arg::new("on")
                        .long("on")
                        .help("Single calendar date (overrides --start/--end)"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        )))
        .subcommand(
            Command::new("rm")
                .about("Delete an entry permanently")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(json_flags(range_args(
            Command::new("report")
                .about("Summary, category breakdown, and location breakdown"),
        )))
        .subcommand(range_args(
            Command::new("export")
                .about("Export filtered entries to CSV")
                .arg(
                    Arg::new("on")
                        .long("on")
                        .help("Single calendar date (overrides --start/--end)"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Output path (default: deterministic name in cwd)"),
                ),
        ))
}

fn credit_cmd() -> Command {
    Command::new("credit")
        .about("Credit sales: installment sales with payment history")
        .subcommand(
            Command::new("add")
                .about("Record a credit sale")
                .arg(Arg::new("vehicle-type").long("vehicle-type").required(true))
                .arg(Arg::new("reg").long("reg").required(true))
                .arg(Arg::new("customer").long("customer").required(true))
                .arg(Arg::new("id-card").long("id-card"))
                .arg(Arg::new("phone").long("phone"))
                .arg(Arg::new("address").long("address"))
                .arg(Arg::new("price").long("price").required(true))
                .arg(Arg::new("advance").long("advance").default_value("0"))
                .arg(Arg::new("sale-date").long("sale-date").required(true))
                .arg(Arg::new("completion-date").long("completion-date"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("list").about("List credit sales").arg(
                Arg::new("status")
                    .long("status")
                    .help("pending|completed|cancelled"),
            ),
        ))
        .subcommand(json_flags(
            Command::new("view")
                .about("Show one sale with payments and schedule")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        ))
        .subcommand(
            Command::new("pay")
                .about("Append a payment to a sale")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("method").long("method").default_value("cash"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("schedule")
                .about("Create an installment schedule for a sale")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("first-due")
                        .long("first-due")
                        .required(true)
                        .help("Due date of the first installment (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new("months")
                        .long("months")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Number of monthly installments"),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .help("Amount per installment"),
                ),
        )
        .subcommand(
            Command::new("mark-paid")
                .about("Mark one installment as paid")
                .arg(
                    Arg::new("installment")
                        .long("installment")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Set a sale's status")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .required(true)
                        .help("pending|completed|cancelled"),
                ),
        )
        .subcommand(json_flags(
            Command::new("totals").about("Aggregate position across all sales"),
        ))
        .subcommand(
            Command::new("rm").about("Delete a sale permanently").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
}

fn vehicle_cmd() -> Command {
    Command::new("vehicle")
        .about("Inventory: vehicles with ownership history")
        .subcommand(
            Command::new("add")
                .about("Add a vehicle (writes the initial ownership record)")
                .arg(Arg::new("reg").long("reg").required(true))
                .arg(Arg::new("engine").long("engine"))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .default_value("bought")
                        .help("bought|sold"),
                )
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("id-card").long("id-card"))
                .arg(Arg::new("phone").long("phone"))
                .arg(Arg::new("address").long("address"))
                .arg(Arg::new("price").long("price").required(true))
                .arg(
                    Arg::new("commission")
                        .long("commission")
                        .default_value("0"),
                )
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List vehicles with inventory totals")
                .arg(Arg::new("kind").long("kind").help("bought|sold")),
        ))
        .subcommand(json_flags(
            Command::new("search")
                .about("Search by registration, ID card, name, or phone")
                .arg(Arg::new("query").long("query").required(true)),
        ))
        .subcommand(
            Command::new("update")
                .about("Update holder details (appends an update record)")
                .arg(Arg::new("reg").long("reg").required(true))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("id-card").long("id-card"))
                .arg(Arg::new("phone").long("phone"))
                .arg(Arg::new("address").long("address"))
                .arg(Arg::new("price").long("price"))
                .arg(Arg::new("commission").long("commission"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("transfer")
                .about("Transfer to a new holder (appends a transfer record, marks sold)")
                .arg(Arg::new("reg").long("reg").required(true))
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("id-card").long("id-card"))
                .arg(Arg::new("phone").long("phone"))
                .arg(Arg::new("address").long("address"))
                .arg(Arg::new("price").long("price"))
                .arg(Arg::new("commission").long("commission"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("history")
                .about("Show the ownership history of a vehicle")
                .arg(Arg::new("reg").long("reg").required(true)),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a vehicle permanently")
                .arg(Arg::new("reg").long("reg").required(true)),
        )
}

fn investor_cmd() -> Command {
    Command::new("investor")
        .about("Investor capital tracking")
        .subcommand(
            Command::new("add")
                .about("Register an investor")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("list").about("List investors with balances"),
        ))
        .subcommand(json_flags(
            Command::new("view")
                .about("Show one investor with transactions")
                .arg(Arg::new("name").long("name").required(true)),
        ))
        .subcommand(
            Command::new("invest")
                .about("Record capital in")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("repay")
                .about("Record capital returned")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("tx-rm")
                .about("Delete one transaction by id")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete an investor permanently")
                .arg(Arg::new("name").long("name").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("dealerbook")
        .about("Vehicle-dealership back-office: cash ledger, credit sales, inventory, investors")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(cash_cmd())
        .subcommand(credit_cmd())
        .subcommand(vehicle_cmd())
        .subcommand(investor_cmd())
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Monthly vehicle stats plus cashflow summary")
                .arg(Arg::new("month").long("month").help("YYYY-MM, default current")),
        ))
        .subcommand(Command::new("doctor").about("Data integrity checks"))
}
