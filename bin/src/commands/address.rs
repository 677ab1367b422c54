use crate::cli::AddressCommand;
use anyhow::Result;
use plat::NavigableAddress;

pub fn handle(command: AddressCommand) -> Result<()> {
    match command {
        AddressCommand::Decode { query } => {
            let query = query.strip_prefix('?').unwrap_or(&query);
            let address = NavigableAddress::parse(query);
            let intent = address.decode_selection();
            let canonical = address.apply_intent(&intent);

            println!("{}", serde_json::to_string_pretty(&intent)?);
            println!("canonical: {}", canonical.encode());
            Ok(())
        },
    }
}
