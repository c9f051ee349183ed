use gridpack::{GridPacker, InputItem};

fn main() {
    env_logger::init();

    let inputs: Vec<_> = (0..5).map(|_| InputItem::new((16, 16))).collect();

    let packer = GridPacker::new(16, 4);
    match packer.pack(inputs) {
        Ok(result) => println!("Pack result: {:#?}", result),
        Err(err) => eprintln!("Error: {}", err),
    }
}
