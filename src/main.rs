fn main() {
    nestmsg::cli::run();
}
