mod aluno_repo;
mod configuracao_repo;
mod matricula_repo;
mod pagamento_repo;
mod pedido_repo;
mod usuario_repo;

pub use aluno_repo::AlunoRepository;
pub use configuracao_repo::ConfiguracaoRepository;
pub use matricula_repo::MatriculaRepository;
pub use pagamento_repo::PagamentoRepository;
pub use pedido_repo::PedidoRepository;
pub use usuario_repo::UsuarioRepository;
