fn main() -> anyhow::Result<()> {
    supplier_qa::cli::main()
}
