fn main() -> Result<(), Box<dyn std::error::Error>> {
    chatlpt::cli::main()
}
